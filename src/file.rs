//! File utilities.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::from_reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("cannot open {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, JsonFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| JsonFileError::Io {
        path: path.into(),
        source,
    })?;
    from_reader(BufReader::new(file)).map_err(|source| JsonFileError::Json {
        path: path.into(),
        source,
    })
}
