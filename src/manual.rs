//! Hand-maintained ratings for teams without usable results, taking precedence over computed
//! ratings.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alias::TeamAliases;
use crate::domain::{CompetitionId, TeamId};
use crate::expectation::{validate_rating, InvalidRating};
use crate::file::{self, JsonFileError};
use crate::rating::TeamRating;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualRating {
    pub attack: f64,
    pub defense: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualRatings(BTreeMap<TeamId, ManualRating>);
impl ManualRatings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, JsonFileError> {
        file::read_json(path)
    }

    pub fn insert(&mut self, team: TeamId, rating: ManualRating) -> Option<ManualRating> {
        self.0.insert(team, rating)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validates every entry, yielding the ratings under their canonical team names. Manual
    /// ratings are always reliable and are attributed to the `manual` pseudo-competition.
    pub fn to_team_ratings(&self, aliases: &TeamAliases) -> Result<Vec<TeamRating>, InvalidRating> {
        self.0
            .iter()
            .map(|(team, manual)| {
                let rating = TeamRating {
                    team: aliases.resolve(team.as_str()),
                    attack: manual.attack,
                    defense: manual.defense,
                    competition: CompetitionId::manual(),
                    sample_size: 0,
                    reliable: true,
                };
                validate_rating(&rating)?;
                Ok(rating)
            })
            .collect()
    }
}

impl FromIterator<(TeamId, ManualRating)> for ManualRatings {
    fn from_iter<I: IntoIterator<Item = (TeamId, ManualRating)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::expectation::RatingField;

    use super::*;

    #[test]
    fn deserialise_and_canonicalise() {
        let manual: ManualRatings = serde_json::from_str(
            r#"{
                "Man Utd": {"attack": 1.3, "defense": 0.8},
                "Brann": {"attack": 0.9, "defense": 1.1}
            }"#,
        )
        .unwrap();
        assert_eq!(2, manual.len());
        let aliases = TeamAliases::new(&BTreeMap::from([(
            "Manchester United".to_string(),
            vec!["Man Utd".to_string()],
        )]));
        let ratings = manual.to_team_ratings(&aliases).unwrap();
        assert_eq!(
            vec![
                TeamRating {
                    team: TeamId::from("Brann"),
                    attack: 0.9,
                    defense: 1.1,
                    competition: CompetitionId::manual(),
                    sample_size: 0,
                    reliable: true,
                },
                TeamRating {
                    team: TeamId::from("Manchester United"),
                    attack: 1.3,
                    defense: 0.8,
                    competition: CompetitionId::manual(),
                    sample_size: 0,
                    reliable: true,
                },
            ],
            ratings
        );
    }

    #[test]
    fn non_positive_values_rejected() {
        let manual = ManualRatings::from_iter([(
            TeamId::from("Bodo/Glimt"),
            ManualRating {
                attack: 1.2,
                defense: -0.3,
            },
        )]);
        let err = manual.to_team_ratings(&TeamAliases::default()).unwrap_err();
        assert_eq!(TeamId::from("Bodo/Glimt"), err.team);
        assert_eq!(RatingField::Defense, err.field);
    }
}
