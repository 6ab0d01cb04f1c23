//! Per-team attack and defense ratings, normalised against a competition's scoring environment
//! and then corrected for the competition's strength.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::debug;

use crate::domain::{validate_strength_weight, CompetitionDataset, CompetitionId, TeamId};
use crate::error::InvalidParameter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegenerateInput {
    #[error("dataset has no matches")]
    Empty,

    #[error("league average of goals is zero across {0} matches")]
    ZeroAverage(usize),
}

/// Ratings relative to the competition's own scoring environment, before any strength correction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub attack: f64,
    pub defense: f64,
    pub games_played: usize,
}

/// A team's strength for pricing purposes. `attack` above 1 means the team scores more than an
/// average side; `defense` below 1 means it concedes less than an average side (lower is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub team: TeamId,
    pub attack: f64,
    pub defense: f64,
    pub competition: CompetitionId,
    pub sample_size: usize,
    pub reliable: bool,
}

/// What to do with a computed rating whose sample falls short of the configured minimum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityPolicy {
    /// Leave the team out of the table.
    Exclude,

    /// Keep the computed rating, marked as unreliable.
    #[default]
    Flag,

    /// Keep the team, marked as unreliable, with a neutral 1.0/1.0 rating.
    Neutral,
}

/// Mean goals per team per match: `Σ (home_goals + away_goals) / 2` over the number of matches.
pub fn league_average(dataset: &CompetitionDataset) -> Result<f64, DegenerateInput> {
    let matches = dataset.matches();
    if matches.is_empty() {
        return Err(DegenerateInput::Empty);
    }
    let total_goals = matches
        .iter()
        .map(|result| result.total_goals() as f64)
        .sum::<f64>();
    let average = total_goals / 2.0 / matches.len() as f64;
    if average < f64::EPSILON {
        return Err(DegenerateInput::ZeroAverage(matches.len()));
    }
    Ok(average)
}

#[derive(Default)]
struct Tally {
    goals_for: u64,
    goals_against: u64,
    games_played: usize,
}

/// Raw ratings for every team appearing in the dataset, ordered by team.
pub fn build(dataset: &CompetitionDataset) -> Result<BTreeMap<TeamId, RawRating>, DegenerateInput> {
    let league_avg_goals = league_average(dataset)?;

    let mut tallies: BTreeMap<&TeamId, Tally> = BTreeMap::new();
    for result in dataset.matches() {
        let home = tallies.entry(&result.home_team).or_default();
        home.goals_for += result.home_goals as u64;
        home.goals_against += result.away_goals as u64;
        home.games_played += 1;

        let away = tallies.entry(&result.away_team).or_default();
        away.goals_for += result.away_goals as u64;
        away.goals_against += result.home_goals as u64;
        away.games_played += 1;
    }

    let ratings = tallies
        .into_iter()
        .filter(|(_, tally)| tally.games_played > 0)
        .map(|(team, tally)| {
            let games_played = tally.games_played as f64;
            let rating = RawRating {
                attack: tally.goals_for as f64 / games_played / league_avg_goals,
                defense: tally.goals_against as f64 / games_played / league_avg_goals,
                games_played: tally.games_played,
            };
            (team.clone(), rating)
        })
        .collect::<BTreeMap<_, _>>();
    debug!(
        "rated {} teams in {} from {} matches (league average {league_avg_goals:.3})",
        ratings.len(),
        dataset.competition(),
        dataset.matches().len()
    );
    Ok(ratings)
}

/// Cross-competition correction: attack is scaled down by the strength weight, while defense is
/// scaled up by `2 - weight`, so that a weak competition's flattering concede rate is penalised.
/// This is a linear heuristic, not a fitted model. A weight of exactly 1 leaves the rating as-is.
pub fn weigh(raw: &RawRating, strength_weight: f64) -> Result<(f64, f64), InvalidParameter> {
    validate_strength_weight(strength_weight)?;
    Ok(apply_weight(raw, strength_weight))
}

#[inline]
fn apply_weight(raw: &RawRating, strength_weight: f64) -> (f64, f64) {
    (
        raw.attack * strength_weight,
        raw.defense * (2.0 - strength_weight),
    )
}

/// Builds and weighs the ratings of one competition. A rating is reliable only when its team has
/// played more than `min_sample_size` matches; the others are treated according to `policy`.
pub fn rate(
    dataset: &CompetitionDataset,
    min_sample_size: usize,
    policy: ReliabilityPolicy,
) -> Result<Vec<TeamRating>, DegenerateInput> {
    let raw_ratings = build(dataset)?;
    let strength_weight = dataset.strength_weight();
    let mut ratings = Vec::with_capacity(raw_ratings.len());
    for (team, raw) in raw_ratings {
        let reliable = raw.games_played > min_sample_size;
        if raw.attack == 0.0 || raw.defense == 0.0 {
            debug!(
                "{team} has a zero rating in {} (attack {}, defense {}) and cannot be priced",
                dataset.competition(),
                raw.attack,
                raw.defense
            );
        }
        let (attack, defense) = match (reliable, policy) {
            (false, ReliabilityPolicy::Exclude) => {
                debug!("excluding {team}: {} matches played", raw.games_played);
                continue;
            }
            (false, ReliabilityPolicy::Neutral) => (1.0, 1.0),
            _ => apply_weight(&raw, strength_weight),
        };
        ratings.push(TeamRating {
            team,
            attack,
            defense,
            competition: dataset.competition().clone(),
            sample_size: raw.games_played,
            reliable,
        });
    }
    Ok(ratings)
}
