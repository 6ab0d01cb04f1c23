//! The merged, immutable table of team ratings that fixtures are priced against.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::domain::{CompetitionId, TeamId};
use crate::rating::TeamRating;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { teams: usize },
    Failed(String),
}

impl Display for LoadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Loaded { teams } => write!(f, "loaded {teams} teams"),
            LoadStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// The outcome of loading a single competition during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionReport {
    pub competition: CompetitionId,
    pub status: LoadStatus,
}

#[derive(Debug, Clone)]
pub struct RatingTable {
    ratings: FxHashMap<TeamId, TeamRating>,
    reports: Vec<CompetitionReport>,
    built_at: DateTime<Utc>,
}
impl RatingTable {
    pub fn empty() -> Self {
        RatingTableBuilder::default().build()
    }

    pub fn builder() -> RatingTableBuilder {
        RatingTableBuilder::default()
    }

    pub fn get(&self, team: &str) -> Option<&TeamRating> {
        self.ratings.get(team)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// All ratings, ordered by team.
    pub fn sorted(&self) -> Vec<&TeamRating> {
        let mut ratings: Vec<_> = self.ratings.values().collect();
        ratings.sort_by(|a, b| a.team.cmp(&b.team));
        ratings
    }

    pub fn reports(&self) -> &[CompetitionReport] {
        &self.reports
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

/// Accumulates ratings competition by competition. A team rated by more than one competition
/// keeps the rating merged last; manual ratings are applied after every competition.
#[derive(Debug, Default)]
pub struct RatingTableBuilder {
    ratings: FxHashMap<TeamId, TeamRating>,
    manual: Vec<TeamRating>,
    reports: Vec<CompetitionReport>,
}
impl RatingTableBuilder {
    pub fn with_competition(mut self, competition: CompetitionId, ratings: Vec<TeamRating>) -> Self {
        self.merge_competition(competition, ratings);
        self
    }

    pub fn merge_competition(&mut self, competition: CompetitionId, ratings: Vec<TeamRating>) {
        self.reports.push(CompetitionReport {
            competition,
            status: LoadStatus::Loaded {
                teams: ratings.len(),
            },
        });
        for rating in ratings {
            if let Some(replaced) = self.ratings.insert(rating.team.clone(), rating) {
                debug!(
                    "rating for {} from {} superseded",
                    replaced.team, replaced.competition
                );
            }
        }
    }

    pub fn record_failure(&mut self, competition: CompetitionId, reason: impl ToString) {
        self.reports.push(CompetitionReport {
            competition,
            status: LoadStatus::Failed(reason.to_string()),
        });
    }

    pub fn with_manual(mut self, ratings: Vec<TeamRating>) -> Self {
        self.merge_manual(ratings);
        self
    }

    pub fn merge_manual(&mut self, ratings: Vec<TeamRating>) {
        self.manual.extend(ratings);
    }

    pub fn build(self) -> RatingTable {
        let Self {
            mut ratings,
            manual,
            reports,
        } = self;
        for rating in manual {
            ratings.insert(rating.team.clone(), rating);
        }
        RatingTable {
            ratings,
            reports,
            built_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(team: &str, competition: &str, attack: f64) -> TeamRating {
        TeamRating {
            team: TeamId::from(team),
            attack,
            defense: 1.0,
            competition: CompetitionId::from(competition),
            sample_size: 10,
            reliable: true,
        }
    }

    #[test]
    fn later_competition_wins() {
        let table = RatingTable::builder()
            .with_competition(
                CompetitionId::from("E0"),
                vec![rating("A", "E0", 1.1), rating("B", "E0", 0.9)],
            )
            .with_competition(CompetitionId::from("DNK"), vec![rating("A", "DNK", 1.3)])
            .build();
        assert_eq!(2, table.len());
        assert_eq!(CompetitionId::from("DNK"), table.get("A").unwrap().competition);
        assert_eq!(1.3, table.get("A").unwrap().attack);
        assert_eq!(CompetitionId::from("E0"), table.get("B").unwrap().competition);
    }

    #[test]
    fn manual_always_wins() {
        let manual = TeamRating {
            competition: CompetitionId::manual(),
            sample_size: 0,
            ..rating("A", "manual", 2.0)
        };
        // manual ratings merged before a competition still take precedence
        let table = RatingTable::builder()
            .with_manual(vec![manual.clone()])
            .with_competition(CompetitionId::from("E0"), vec![rating("A", "E0", 1.1)])
            .build();
        assert_eq!(Some(&manual), table.get("A"));
    }

    #[test]
    fn reports_and_ordering() {
        let mut builder = RatingTable::builder();
        builder.merge_competition(
            CompetitionId::from("E0"),
            vec![rating("Chelsea", "E0", 1.0), rating("Arsenal", "E0", 1.0)],
        );
        builder.record_failure(CompetitionId::from("SP1"), "dataset has no matches");
        let table = builder.build();
        assert_eq!(
            vec![
                CompetitionReport {
                    competition: CompetitionId::from("E0"),
                    status: LoadStatus::Loaded { teams: 2 },
                },
                CompetitionReport {
                    competition: CompetitionId::from("SP1"),
                    status: LoadStatus::Failed("dataset has no matches".into()),
                },
            ],
            table.reports()
        );
        assert_eq!(
            vec!["Arsenal", "Chelsea"],
            table.sorted().iter().map(|rating| rating.team.as_str()).collect::<Vec<_>>()
        );
        assert_eq!("failed: dataset has no matches", table.reports()[1].status.to_string());
    }

    #[test]
    fn empty_table() {
        let table = RatingTable::empty();
        assert!(table.is_empty());
        assert!(table.reports().is_empty());
        assert!(table.get("A").is_none());
        assert!(table.built_at() <= Utc::now());
    }
}
