//! Where raw competition results come from.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::config::CompetitionConfig;
use crate::csv::{decode_latin1, RawTable};
use crate::domain::CompetitionId;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("no data for competition {0}")]
    NotFound(CompetitionId),

    #[error("cannot download {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
}

/// Supplies the raw results table of a competition.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, competition: &CompetitionConfig) -> Result<RawTable, SourceError>;
}

/// Reads `<dir>/<file>` for each competition. Files are decoded as Latin-1.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}
impl CsvDirSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DatasetSource for CsvDirSource {
    async fn fetch(&self, competition: &CompetitionConfig) -> Result<RawTable, SourceError> {
        let path = self.dir.join(&competition.file);
        let bytes = tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(RawTable::parse(&decode_latin1(&bytes)))
    }
}

/// Downloads each competition from its configured URL. Bodies are decoded as Latin-1.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: Client,
}
impl HttpSource {
    pub const TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!("scoreline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, competition: &CompetitionConfig) -> Result<RawTable, SourceError> {
        let url = competition.url();
        let http_error = |source| SourceError::Http {
            url: url.clone(),
            source,
        };
        let response = self.http.get(&url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.clone(),
                status,
            });
        }
        let bytes = response.bytes().await.map_err(http_error)?;
        debug!("downloaded {} bytes from {url}", bytes.len());
        Ok(RawTable::parse(&decode_latin1(&bytes)))
    }
}

/// Tables held in memory, keyed by competition.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tables: FxHashMap<CompetitionId, RawTable>,
}
impl StaticSource {
    pub fn with_table(mut self, competition: impl Into<CompetitionId>, table: RawTable) -> Self {
        self.insert(competition, table);
        self
    }

    pub fn insert(&mut self, competition: impl Into<CompetitionId>, table: RawTable) {
        self.tables.insert(competition.into(), table);
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch(&self, competition: &CompetitionConfig) -> Result<RawTable, SourceError> {
        self.tables
            .get(&competition.id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(competition.id.clone()))
    }
}
