//! Utilities for working with CSV files.

use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A header row followed by data rows, every cell kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
impl RawTable {
    /// Parses comma-separated text. The first non-blank line is the header; blank lines are
    /// skipped everywhere and cells are trimmed of surrounding whitespace and quotes.
    pub fn parse(text: &str) -> Self {
        let mut lines = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty());
        let header = match lines.next() {
            None => return Self::default(),
            Some(line) => split_record(line.trim_start_matches('\u{feff}')),
        };
        let rows = lines.map(split_record).collect();
        Self { header, rows }
    }

    /// Ordinal of the column with the given header `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|heading| heading == name)
    }
}

/// Football-data files are ISO-8859-1 encoded; every byte maps onto the code point of the same
/// value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}

fn split_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

pub struct CsvWriter<W: Write = BufWriter<File>> {
    writer: W,
}
impl CsvWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(b",")?;
            }
            let datum = datum.as_ref();
            if datum.contains([',', '"']) {
                write!(self.writer, "\"{}\"", datum.replace('"', "\"\""))?;
            } else {
                self.writer.write_all(datum.as_bytes())?;
            }
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines_and_carriage_returns() {
        let table = RawTable::parse("Div,HomeTeam,AwayTeam\r\n\r\nE0,Arsenal,Chelsea\r\n  \nE0,Spurs,Fulham\n");
        assert_eq!(vec!["Div", "HomeTeam", "AwayTeam"], table.header);
        assert_eq!(
            vec![
                vec!["E0", "Arsenal", "Chelsea"],
                vec!["E0", "Spurs", "Fulham"],
            ],
            table.rows
        );
        assert_eq!(Some(2), table.column("AwayTeam"));
        assert_eq!(None, table.column("FTHG"));
    }

    #[test]
    fn parse_strips_quotes() {
        let table = RawTable::parse("\u{feff}\"HomeTeam\",\"AwayTeam\"\n\"Brighton, Hove\",\"Say \"\"hi\"\"\"\n");
        assert_eq!(vec!["HomeTeam", "AwayTeam"], table.header);
        assert_eq!(vec![vec!["Brighton, Hove", "Say \"hi\""]], table.rows);
    }

    #[test]
    fn parse_empty() {
        assert_eq!(RawTable::default(), RawTable::parse(""));
        assert_eq!(RawTable::default(), RawTable::parse("\n\n"));
    }

    #[test]
    fn short_rows_are_kept_as_is() {
        let table = RawTable::parse("A,B,C\n1,2\n1,2,3,4\n");
        assert_eq!(vec!["1", "2"], table.rows[0]);
        assert_eq!(4, table.rows[1].len());
    }

    #[test]
    fn latin1_decoding() {
        assert_eq!("Besiktas", decode_latin1(b"Besiktas"));
        assert_eq!("Malmö", decode_latin1(&[b'M', b'a', b'l', b'm', 0xF6]));
        assert_eq!("Sønderjyske", decode_latin1(b"S\xF8nderjyske"));
    }

    #[test]
    fn writer_quotes_when_needed() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.append(["team", "attack"]).unwrap();
        writer.append(["Brighton, Hove", "1.2"]).unwrap();
        writer.flush().unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!("team,attack\n\"Brighton, Hove\",1.2\n", text);
        let table = RawTable::parse(&text);
        assert_eq!(vec![vec!["Brighton, Hove", "1.2"]], table.rows);
    }
}
