//! Core entities shared by every stage of the rating and pricing pipeline.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::InvalidParameter;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(TeamId);
string_id!(CompetitionId);

impl CompetitionId {
    /// The pseudo-competition that manually supplied ratings are attributed to.
    pub fn manual() -> Self {
        Self::new("manual")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_goals: u8,
    pub away_goals: u8,
}
impl MatchResult {
    pub fn total_goals(&self) -> u16 {
        self.home_goals as u16 + self.away_goals as u16
    }
}

/// All normalised results of one competition, along with the competition's strength relative
/// to the reference competition.
#[derive(Clone, Debug)]
pub struct CompetitionDataset {
    competition: CompetitionId,
    strength_weight: f64,
    matches: Vec<MatchResult>,
}
impl CompetitionDataset {
    pub fn new(
        competition: CompetitionId,
        strength_weight: f64,
        matches: Vec<MatchResult>,
    ) -> Result<Self, InvalidParameter> {
        validate_strength_weight(strength_weight)?;
        Ok(Self {
            competition,
            strength_weight,
            matches,
        })
    }

    pub fn competition(&self) -> &CompetitionId {
        &self.competition
    }

    pub fn strength_weight(&self) -> f64 {
        self.strength_weight
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }
}

pub fn validate_strength_weight(strength_weight: f64) -> Result<(), InvalidParameter> {
    if strength_weight > 0.0 && strength_weight <= 1.0 {
        Ok(())
    } else {
        Err(InvalidParameter::StrengthWeight(strength_weight))
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => f.write_str("Home"),
            Side::Away => f.write_str("Away"),
        }
    }
}
