//! Every tunable constant of the engine, in one place.

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{validate_strength_weight, CompetitionId};
use crate::rating::ReliabilityPolicy;

pub const VALID_SCORE_CAP: RangeInclusive<usize> = 2..=30;

/// football-data.co.uk files of the main leagues, one season per file.
pub const MAIN_LEAGUES_URL: &str = "https://www.football-data.co.uk/mmz4281/2425/";

/// football-data.co.uk files of the extra leagues, every season in one file.
pub const EXTRA_LEAGUES_URL: &str = "https://www.football-data.co.uk/new/";

/// The season kept from the extra league files, matching [MAIN_LEAGUES_URL].
pub const EXTRA_LEAGUES_SEASON: &str = "2024/2025";

/// Header names of the columns the normaliser reads. `season` is only needed when filtering by
/// season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: String,
    pub away_goals: String,
    pub season: String,
}
impl ColumnNames {
    /// The layout of the extra league files.
    pub fn extra_leagues() -> Self {
        Self {
            home_team: "Home".into(),
            away_team: "Away".into(),
            home_goals: "HG".into(),
            away_goals: "AG".into(),
            season: "Season".into(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            home_team: "HomeTeam".into(),
            away_team: "AwayTeam".into(),
            home_goals: "FTHG".into(),
            away_goals: "FTAG".into(),
            season: "Season".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionConfig {
    pub id: CompetitionId,
    pub file: String,
    pub strength_weight: f64,
    #[serde(default)]
    pub columns: ColumnNames,

    /// Prefix of the download URL; the file name is appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// When set, only rows of this season are kept.
    #[serde(default)]
    pub season: Option<String>,
}
impl CompetitionConfig {
    /// A main league competition whose id is the file name without its extension.
    pub fn new(file: &str, strength_weight: f64) -> Self {
        let id = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
        Self {
            id: CompetitionId::from(id),
            file: file.into(),
            strength_weight,
            columns: ColumnNames::default(),
            base_url: default_base_url(),
            season: None,
        }
    }

    /// An extra league competition, read from the multi-season files for the current season.
    pub fn extra_league(file: &str, strength_weight: f64) -> Self {
        Self::new(file, strength_weight)
            .with_base_url(EXTRA_LEAGUES_URL)
            .with_columns(ColumnNames::extra_leagues())
            .with_season(EXTRA_LEAGUES_SEASON)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, self.file)
        } else {
            format!("{}/{}", self.base_url, self.file)
        }
    }
}

fn default_base_url() -> String {
    MAIN_LEAGUES_URL.into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Later competitions take precedence when a team appears in more than one.
    pub competitions: Vec<CompetitionConfig>,
    pub home_advantage: f64,
    pub goal_environment: f64,
    pub rho: f64,
    pub score_cap: usize,
    pub min_sample_size: usize,
    pub reliability: ReliabilityPolicy,
    pub over_under: Vec<f64>,
    pub top_scores: usize,

    /// Canonical team name mapped to the other spellings it appears under.
    pub aliases: BTreeMap<String, Vec<String>>,
    pub refresh_interval_secs: u64,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let mut ids = HashSet::with_capacity(self.competitions.len());
        for competition in &self.competitions {
            if competition.id.as_str().trim().is_empty() {
                bail!("competition id cannot be empty (file {})", competition.file);
            }
            if !ids.insert(&competition.id) {
                bail!("duplicate competition {}", competition.id);
            }
            validate_strength_weight(competition.strength_weight)?;
            if !(competition.base_url.starts_with("http://")
                || competition.base_url.starts_with("https://"))
            {
                bail!(
                    "base URL of {} must be http or https, got '{}'",
                    competition.id,
                    competition.base_url
                );
            }
            if let Some(season) = &competition.season {
                if season.trim().is_empty() {
                    bail!("season filter of {} cannot be empty", competition.id);
                }
            }
        }
        if !(self.home_advantage > 0.0 && self.home_advantage.is_finite()) {
            bail!("home advantage must be positive, got {}", self.home_advantage);
        }
        if self.home_advantage <= 1.0 {
            warn!(
                "home advantage of {} does not favour the home side",
                self.home_advantage
            );
        }
        if !(self.goal_environment > 0.0 && self.goal_environment.is_finite()) {
            bail!("goal environment must be positive, got {}", self.goal_environment);
        }
        if !self.rho.is_finite() {
            bail!("rho must be finite");
        }
        if self.refresh_interval_secs == 0 {
            bail!("refresh interval must be at least one second");
        }
        if !VALID_SCORE_CAP.contains(&self.score_cap) {
            bail!("score cap must be in the range {VALID_SCORE_CAP:?}");
        }
        for &line in &self.over_under {
            if !(line >= 0.0 && line.is_finite()) {
                bail!("over/under line {line} must be a non-negative number");
            }
        }
        let mut aliased = HashSet::new();
        for (canonical, alternatives) in &self.aliases {
            if canonical.trim().is_empty() {
                bail!("canonical team name cannot be empty");
            }
            for alias in alternatives {
                if !aliased.insert(alias.trim().to_lowercase()) {
                    bail!("alias '{alias}' maps to more than one team");
                }
            }
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut competitions: Vec<_> = [
            ("E0.csv", 1.00),
            ("SP1.csv", 0.95),
            ("I1.csv", 0.95),
            ("D1.csv", 0.92),
            ("F1.csv", 0.90),
            ("P1.csv", 0.82),
            ("N1.csv", 0.80),
            ("B1.csv", 0.78),
            ("T1.csv", 0.75),
            ("G1.csv", 0.72),
        ]
        .into_iter()
        .map(|(file, strength_weight)| CompetitionConfig::new(file, strength_weight))
        .collect();
        competitions.push(CompetitionConfig::extra_league("DNK.csv", 0.70));

        Self {
            competitions,
            home_advantage: 1.15,
            goal_environment: 1.45,
            rho: -0.13,
            score_cap: 8,
            min_sample_size: 5,
            reliability: ReliabilityPolicy::default(),
            over_under: vec![1.5, 2.5],
            top_scores: 5,
            aliases: BTreeMap::new(),
            refresh_interval_secs: 3_600,
        }
    }
}
