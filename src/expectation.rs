//! Expected goals for each side of a fixture, from the two teams' weighted ratings.

use thiserror::Error;

use crate::config::Config;
use crate::domain::{Side, TeamId};
use crate::error::InvalidParameter;
use crate::rating::TeamRating;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{team} has a non-positive {field} rating ({value})")]
pub struct InvalidRating {
    pub team: TeamId,
    pub field: RatingField,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RatingField {
    Attack,
    Defense,
}

/// Independent Poisson rates for the home and away goal counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureExpectation {
    home_lambda: f64,
    away_lambda: f64,
}
impl FixtureExpectation {
    pub fn try_new(home_lambda: f64, away_lambda: f64) -> Result<Self, InvalidParameter> {
        validate_lambda(Side::Home, home_lambda)?;
        validate_lambda(Side::Away, away_lambda)?;
        Ok(Self {
            home_lambda,
            away_lambda,
        })
    }

    pub fn home_lambda(&self) -> f64 {
        self.home_lambda
    }

    pub fn away_lambda(&self) -> f64 {
        self.away_lambda
    }
}

fn validate_lambda(side: Side, value: f64) -> Result<(), InvalidParameter> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(InvalidParameter::Lambda { side, value })
    }
}

#[derive(Debug, Error)]
pub enum ExpectationError {
    #[error("{0}")]
    InvalidRating(#[from] InvalidRating),

    #[error("{0}")]
    InvalidParameter(#[from] InvalidParameter),
}

pub fn validate_rating(rating: &TeamRating) -> Result<(), InvalidRating> {
    for (field, value) in [
        (RatingField::Attack, rating.attack),
        (RatingField::Defense, rating.defense),
    ] {
        if !(value > 0.0 && value.is_finite()) {
            return Err(InvalidRating {
                team: rating.team.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

/// `λ_home = home.attack · away.defense · goal_environment · home_advantage` and
/// `λ_away = away.attack · home.defense · goal_environment`.
pub fn expect(
    home: &TeamRating,
    away: &TeamRating,
    config: &Config,
) -> Result<FixtureExpectation, ExpectationError> {
    validate_rating(home)?;
    validate_rating(away)?;
    let home_lambda = home.attack * away.defense * config.goal_environment * config.home_advantage;
    let away_lambda = away.attack * home.defense * config.goal_environment;
    Ok(FixtureExpectation::try_new(home_lambda, away_lambda)?)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use crate::domain::CompetitionId;

    use super::*;

    fn rating(team: &str, attack: f64, defense: f64) -> TeamRating {
        TeamRating {
            team: TeamId::from(team),
            attack,
            defense,
            competition: CompetitionId::from("E0"),
            sample_size: 38,
            reliable: true,
        }
    }

    #[test]
    fn lambdas_combine_ratings_and_constants() {
        let config = Config {
            home_advantage: 1.15,
            goal_environment: 1.45,
            ..Config::default()
        };
        let home = rating("Roma", 1.2, 0.9);
        let away = rating("Midtjylland", 0.8, 1.1);
        let expectation = expect(&home, &away, &config).unwrap();
        assert_float_relative_eq!(1.2 * 1.1 * 1.45 * 1.15, expectation.home_lambda(), 1e-12);
        assert_float_relative_eq!(0.8 * 0.9 * 1.45, expectation.away_lambda(), 1e-12);
    }

    #[test]
    fn neutral_ratings_yield_environment() {
        let config = Config {
            home_advantage: 1.0,
            goal_environment: 1.5,
            ..Config::default()
        };
        let expectation = expect(&rating("A", 1.0, 1.0), &rating("B", 1.0, 1.0), &config).unwrap();
        assert_eq!(1.5, expectation.home_lambda());
        assert_eq!(1.5, expectation.away_lambda());
    }

    #[test]
    fn non_positive_rating_rejected_with_context() {
        let config = Config::default();
        let err = expect(&rating("A", 1.0, 1.0), &rating("B", 1.0, 0.0), &config).unwrap_err();
        match err {
            ExpectationError::InvalidRating(InvalidRating { team, field, value }) => {
                assert_eq!(TeamId::from("B"), team);
                assert_eq!(RatingField::Defense, field);
                assert_eq!(0.0, value);
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = expect(&rating("A", -0.1, 1.0), &rating("B", 1.0, 1.0), &config).unwrap_err();
        assert_eq!(
            "A has a non-positive attack rating (-0.1)",
            err.to_string()
        );
    }

    #[test]
    fn lambda_must_be_positive() {
        assert!(FixtureExpectation::try_new(0.0, 1.0).is_err());
        assert!(FixtureExpectation::try_new(1.0, f64::INFINITY).is_err());
        assert!(FixtureExpectation::try_new(1.0, f64::NAN).is_err());
        assert!(FixtureExpectation::try_new(0.1, 0.1).is_ok());
    }
}
