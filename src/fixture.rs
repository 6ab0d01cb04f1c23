//! Pricing of a single fixture against a rating table.

use thiserror::Error;

use crate::config::Config;
use crate::domain::TeamId;
use crate::error::InvalidParameter;
use crate::expectation::{self, ExpectationError, FixtureExpectation, InvalidRating};
use crate::market::{self, MarketError, Markets};
use crate::rating::TeamRating;
use crate::scoregrid::Scoregrid;
use crate::table::RatingTable;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("no rating for team '{0}'")]
    UnknownTeam(TeamId),

    #[error("{0}")]
    InvalidRating(#[from] InvalidRating),

    #[error("{home} v {away}: {source}")]
    InvalidParameter {
        home: TeamId,
        away: TeamId,
        source: InvalidParameter,
    },

    #[error("{home} v {away}: {source}")]
    Market {
        home: TeamId,
        away: TeamId,
        source: MarketError,
    },
}

#[derive(Debug, Clone)]
pub struct FixturePrices {
    pub home: TeamRating,
    pub away: TeamRating,
    pub expectation: FixtureExpectation,
    pub scoregrid: Scoregrid,
    pub markets: Markets,
}

/// Runs the full pipeline for `home` v `away`: expected goals, the adjusted scoregrid and the
/// markets derived from it. The table is only read.
pub fn price(
    table: &RatingTable,
    config: &Config,
    home: &str,
    away: &str,
) -> Result<FixturePrices, FixtureError> {
    let home = lookup(table, home)?;
    let away = lookup(table, away)?;
    let in_context = |source: InvalidParameter| FixtureError::InvalidParameter {
        home: home.team.clone(),
        away: away.team.clone(),
        source,
    };

    let expectation = match expectation::expect(home, away, config) {
        Ok(expectation) => expectation,
        Err(ExpectationError::InvalidRating(err)) => return Err(err.into()),
        Err(ExpectationError::InvalidParameter(err)) => return Err(in_context(err)),
    };
    let scoregrid =
        Scoregrid::dixon_coles(&expectation, config.score_cap, config.rho).map_err(in_context)?;
    let markets = market::aggregate(&scoregrid, &config.over_under, config.top_scores).map_err(
        |source| FixtureError::Market {
            home: home.team.clone(),
            away: away.team.clone(),
            source,
        },
    )?;

    Ok(FixturePrices {
        home: home.clone(),
        away: away.clone(),
        expectation,
        scoregrid,
        markets,
    })
}

fn lookup<'a>(table: &'a RatingTable, team: &str) -> Result<&'a TeamRating, FixtureError> {
    table
        .get(team)
        .ok_or_else(|| FixtureError::UnknownTeam(TeamId::from(team)))
}
