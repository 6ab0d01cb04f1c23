//! Conversion of raw tabular results into validated match records.

use thiserror::Error;
use tracing::debug;

use crate::alias::TeamAliases;
use crate::config::ColumnNames;
use crate::csv::RawTable;
use crate::domain::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(String),
}

/// The surviving matches, along with the number of rows that could not be used and the number
/// of rows belonging to other seasons.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalised {
    pub matches: Vec<MatchResult>,
    pub dropped: usize,
    pub out_of_season: usize,
}

struct Ordinals {
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
    season: Option<usize>,
}
impl Ordinals {
    fn locate(
        table: &RawTable,
        columns: &ColumnNames,
        season: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let locate = |name: &String| {
            table
                .column(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.clone()))
        };
        Ok(Self {
            home_team: locate(&columns.home_team)?,
            away_team: locate(&columns.away_team)?,
            home_goals: locate(&columns.home_goals)?,
            away_goals: locate(&columns.away_goals)?,
            season: season.map(|_| locate(&columns.season)).transpose()?,
        })
    }
}

/// Extracts the matches from `table`. Rows with a missing or malformed cell are dropped rather
/// than coerced; only a header lacking one of the `columns` is an error. When a `season` is
/// given, rows whose season cell differs are skipped.
pub fn normalise(
    table: &RawTable,
    columns: &ColumnNames,
    season: Option<&str>,
    aliases: &TeamAliases,
) -> Result<Normalised, SchemaError> {
    let ordinals = Ordinals::locate(table, columns, season)?;
    let mut matches = Vec::with_capacity(table.rows.len());
    let mut dropped = 0;
    let mut out_of_season = 0;
    for row in &table.rows {
        if let (Some(season), Some(ordinal)) = (season, ordinals.season) {
            if row.get(ordinal).map(|cell| cell.trim()) != Some(season) {
                out_of_season += 1;
                continue;
            }
        }
        match parse_row(row, &ordinals, aliases) {
            Some(result) => matches.push(result),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(
            "dropped {dropped} of {} rows with missing or malformed cells",
            table.rows.len()
        );
    }
    Ok(Normalised {
        matches,
        dropped,
        out_of_season,
    })
}

fn parse_row(row: &[String], ordinals: &Ordinals, aliases: &TeamAliases) -> Option<MatchResult> {
    let home_team = team_name(row.get(ordinals.home_team)?)?;
    let away_team = team_name(row.get(ordinals.away_team)?)?;
    let home_goals = parse_goals(row.get(ordinals.home_goals)?)?;
    let away_goals = parse_goals(row.get(ordinals.away_goals)?)?;
    Some(MatchResult {
        home_team: aliases.resolve(home_team),
        away_team: aliases.resolve(away_team),
        home_goals,
        away_goals,
    })
}

fn team_name(cell: &str) -> Option<&str> {
    let name = cell.trim();
    (!name.is_empty()).then_some(name)
}

/// Parses a goal count, accepting integral reals such as `2.0`.
pub fn parse_goals(cell: &str) -> Option<u8> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(goals) = cell.parse::<u8>() {
        return Some(goals);
    }
    let goals = cell.parse::<f64>().ok()?;
    if goals.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&goals) {
        Some(goals as u8)
    } else {
        None
    }
}
