//! The joint distribution of full-time scores: independent Poisson margins with the Dixon-Coles
//! adjustment for low scores.

use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

use tracing::debug;

use crate::config::VALID_SCORE_CAP;
use crate::domain::{Score, Side};
use crate::error::InvalidParameter;
use crate::expectation::FixtureExpectation;
use crate::poisson;
use crate::probs::SliceExt;

/// Tolerance applied when checking that probabilities add up to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// A square grid of score probabilities, indexed by `(home_goals, away_goals)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoregrid {
    data: Vec<f64>,
    cap: usize,
    tail_mass: f64,
}
impl Scoregrid {
    pub fn allocate(cap: usize) -> Self {
        let (len, overflow) = cap.overflowing_mul(cap);
        assert!(!overflow, "allocation of a {cap}x{cap} scoregrid failed due to overflow");
        assert!(
            cap <= u8::MAX as usize + 1,
            "a {cap}x{cap} scoregrid has goal counts beyond {}",
            u8::MAX
        );
        Self {
            data: vec![0.0; len],
            cap,
            tail_mass: 0.0,
        }
    }

    /// Builds the complete scoregrid for a fixture: independent Poisson margins, followed by
    /// the Dixon-Coles adjustment and renormalisation.
    pub fn dixon_coles(
        expectation: &FixtureExpectation,
        cap: usize,
        rho: f64,
    ) -> Result<Self, InvalidParameter> {
        if !VALID_SCORE_CAP.contains(&cap) {
            return Err(InvalidParameter::ScoreCap(cap));
        }
        let mut scoregrid = Self::allocate(cap);
        from_univariate_poisson(
            expectation.home_lambda(),
            expectation.away_lambda(),
            &mut scoregrid,
        );
        scoregrid.tail_mass = 1.0 - scoregrid.sum();
        debug!(
            "independent {cap}x{cap} scoregrid for λ=({:.3}, {:.3}) leaves tail mass {:.3e}",
            expectation.home_lambda(),
            expectation.away_lambda(),
            scoregrid.tail_mass
        );
        adjust_dixon_coles(
            expectation.home_lambda(),
            expectation.away_lambda(),
            rho,
            &mut scoregrid,
        )?;
        renormalise(&mut scoregrid)?;
        Ok(scoregrid)
    }

    /// Number of rows (and columns); scores range over `0..cap`.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Probability of scores beyond the cap under the independent model, which is redistributed
    /// across the grid by renormalisation.
    pub fn tail_mass(&self) -> f64 {
        self.tail_mass
    }

    pub fn row_slice(&self, home_goals: usize) -> &[f64] {
        debug_assert!(self.validate_index(home_goals));
        let row_start = home_goals * self.cap;
        &self.data[row_start..(row_start + self.cap)]
    }

    pub fn flatten(&self) -> &[f64] {
        &self.data
    }

    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// Iterates over every cell as a `(score, probability)` pair, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Score, f64)> + '_ {
        self.data.iter().enumerate().map(|(index, &prob)| {
            let score = Score::new((index / self.cap) as u8, (index % self.cap) as u8);
            (score, prob)
        })
    }

    fn validate_index(&self, index: usize) -> bool {
        assert!(
            index < self.cap,
            "invalid goal index {index} for a {}x{} scoregrid",
            self.cap,
            self.cap
        );
        true
    }
}

impl Index<(usize, usize)> for Scoregrid {
    type Output = f64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (home_goals, away_goals) = index;
        debug_assert!(self.validate_index(home_goals));
        debug_assert!(self.validate_index(away_goals));
        &self.data[home_goals * self.cap + away_goals]
    }
}

impl IndexMut<(usize, usize)> for Scoregrid {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (home_goals, away_goals) = index;
        debug_assert!(self.validate_index(home_goals));
        debug_assert!(self.validate_index(away_goals));
        &mut self.data[home_goals * self.cap + away_goals]
    }
}

pub fn from_univariate_poisson(home_rate: f64, away_rate: f64, scoregrid: &mut Scoregrid) {
    let cap = scoregrid.cap();
    let mut home_probs = vec![0.0; cap];
    let mut away_probs = vec![0.0; cap];
    poisson::fill(home_rate, &mut home_probs);
    poisson::fill(away_rate, &mut away_probs);
    for (home_goals, &home_prob) in home_probs.iter().enumerate() {
        for (away_goals, &away_prob) in away_probs.iter().enumerate() {
            scoregrid[(home_goals, away_goals)] = home_prob * away_prob;
        }
    }
}

/// The Dixon-Coles dependence factor τ for a given cell. Only the four cells with at most one
/// goal per side are affected; every other cell returns 1.
#[inline]
pub fn tau(home_goals: usize, away_goals: usize, home_rate: f64, away_rate: f64, rho: f64) -> f64 {
    match (home_goals, away_goals) {
        (0, 0) => 1.0 - home_rate * away_rate * rho,
        (0, 1) => 1.0 + home_rate * rho,
        (1, 0) => 1.0 + away_rate * rho,
        (1, 1) => 1.0 - rho,
        _ => 1.0,
    }
}

const ADJUSTED_CELLS: [(usize, usize); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

/// Multiplies the four low-score cells by their τ factors. The grid is left unmodified if any
/// factor is negative. The result no longer sums to one; see [renormalise].
pub fn adjust_dixon_coles(
    home_rate: f64,
    away_rate: f64,
    rho: f64,
    scoregrid: &mut Scoregrid,
) -> Result<(), InvalidParameter> {
    if scoregrid.cap() < 2 {
        return Err(InvalidParameter::ScoreCap(scoregrid.cap()));
    }
    let mut taus = [0.0; ADJUSTED_CELLS.len()];
    for (index, &(home_goals, away_goals)) in ADJUSTED_CELLS.iter().enumerate() {
        let tau = tau(home_goals, away_goals, home_rate, away_rate, rho);
        if tau < 0.0 || tau.is_nan() {
            return Err(InvalidParameter::NegativeAdjustment {
                cell: (home_goals, away_goals),
                tau,
                rho,
            });
        }
        taus[index] = tau;
    }
    for (&cell, tau) in ADJUSTED_CELLS.iter().zip(taus) {
        scoregrid[cell] *= tau;
    }
    Ok(())
}

/// Scales the grid so that it sums to one, returning the sum prior to scaling. The result is
/// checked: every cell must lie in [0, 1] and the total must be within [SUM_TOLERANCE] of 1.
pub fn renormalise(scoregrid: &mut Scoregrid) -> Result<f64, InvalidParameter> {
    let sum = scoregrid.data.normalise(1.0);
    for (index, &value) in scoregrid.data.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(InvalidParameter::CellOutOfRange {
                cell: (index / scoregrid.cap, index % scoregrid.cap),
                value,
            });
        }
    }
    let total = scoregrid.sum();
    if (total - 1.0).abs() > SUM_TOLERANCE {
        return Err(InvalidParameter::Unnormalised(total));
    }
    Ok(sum)
}

/// A half-goal (or whole-goal) line for totals markets.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Line(pub f64);

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Win(Side),
    Draw,
    GoalsOver(Line),
    GoalsUnder(Line),
    BothScore(bool),
    CorrectScore(Score),
}
impl Outcome {
    pub fn gather(&self, scoregrid: &Scoregrid) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_win(side, scoregrid),
            Outcome::Draw => Self::gather_draw(scoregrid),
            Outcome::GoalsOver(line) => Self::gather_total(scoregrid, |total| total > line.0),
            Outcome::GoalsUnder(line) => Self::gather_total(scoregrid, |total| total < line.0),
            Outcome::BothScore(both) => Self::gather_both_score(*both, scoregrid),
            Outcome::CorrectScore(score) => Self::gather_correct_score(score, scoregrid),
        }
    }

    fn gather_win(side: &Side, scoregrid: &Scoregrid) -> f64 {
        let mut prob = 0.0;
        match side {
            Side::Home => {
                for row in 1..scoregrid.cap() {
                    for col in 0..row {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
            Side::Away => {
                for col in 1..scoregrid.cap() {
                    for row in 0..col {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
        }
        prob
    }

    fn gather_draw(scoregrid: &Scoregrid) -> f64 {
        let mut prob = 0.0;
        for index in 0..scoregrid.cap() {
            prob += scoregrid[(index, index)];
        }
        prob
    }

    fn gather_total(scoregrid: &Scoregrid, mut include: impl FnMut(f64) -> bool) -> f64 {
        let mut prob = 0.0;
        for row in 0..scoregrid.cap() {
            for col in 0..scoregrid.cap() {
                if include((row + col) as f64) {
                    prob += scoregrid[(row, col)];
                }
            }
        }
        prob
    }

    fn gather_both_score(both: bool, scoregrid: &Scoregrid) -> f64 {
        let mut prob = 0.0;
        for row in 0..scoregrid.cap() {
            for col in 0..scoregrid.cap() {
                if (row >= 1 && col >= 1) == both {
                    prob += scoregrid[(row, col)];
                }
            }
        }
        prob
    }

    fn gather_correct_score(score: &Score, scoregrid: &Scoregrid) -> f64 {
        let (home, away) = (score.home as usize, score.away as usize);
        if home < scoregrid.cap() && away < scoregrid.cap() {
            scoregrid[(home, away)]
        } else {
            0.0
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win(side) => write!(f, "{side} win"),
            Outcome::Draw => f.write_str("Draw"),
            Outcome::GoalsOver(line) => write!(f, "Over {line}"),
            Outcome::GoalsUnder(line) => write!(f, "Under {line}"),
            Outcome::BothScore(true) => f.write_str("Both score"),
            Outcome::BothScore(false) => f.write_str("Not both score"),
            Outcome::CorrectScore(score) => write!(f, "Score {score}"),
        }
    }
}
