//! Market probabilities and fair prices, aggregated from a scoregrid.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::domain::{Score, Side};
use crate::scoregrid::{Line, Outcome, Scoregrid, SUM_TOLERANCE};

/// The reciprocal of a probability. A zero probability has no fair price, which is not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FairPrice {
    Price(f64),
    Undefined,
}
impl FairPrice {
    pub fn from_prob(prob: f64) -> Self {
        if prob == 0.0 {
            FairPrice::Undefined
        } else {
            FairPrice::Price(1.0 / prob)
        }
    }

    pub fn decimal(&self) -> Option<f64> {
        match self {
            FairPrice::Price(price) => Some(*price),
            FairPrice::Undefined => None,
        }
    }
}

impl Display for FairPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FairPrice::Price(price) => write!(f, "{price:.2}"),
            FairPrice::Undefined => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedOutcome {
    pub outcome: Outcome,
    pub prob: f64,
    pub price: FairPrice,
}
impl PricedOutcome {
    pub fn gather(outcome: Outcome, scoregrid: &Scoregrid) -> Self {
        let prob = outcome.gather(scoregrid);
        Self {
            outcome,
            prob,
            price: FairPrice::from_prob(prob),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalsMarket {
    pub line: Line,
    pub over: PricedOutcome,
    pub under: PricedOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Markets {
    pub home_win: PricedOutcome,
    pub draw: PricedOutcome,
    pub away_win: PricedOutcome,
    pub goals: Vec<GoalsMarket>,
    pub both_score: PricedOutcome,
    pub not_both_score: PricedOutcome,

    /// The most likely scores, most probable first.
    pub correct_scores: Vec<PricedOutcome>,
}
impl Markets {
    pub fn outcomes(&self) -> impl Iterator<Item = &PricedOutcome> {
        [&self.home_win, &self.draw, &self.away_win]
            .into_iter()
            .chain(self.goals.iter().flat_map(|goals| [&goals.over, &goals.under]))
            .chain([&self.both_score, &self.not_both_score])
            .chain(self.correct_scores.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    #[error("1X2 probabilities sum to {0}")]
    Unbalanced(f64),

    #[error("probability of '{outcome}' is out of range: {prob}")]
    ProbOutOfRange { outcome: Outcome, prob: f64 },
}

pub fn aggregate(
    scoregrid: &Scoregrid,
    over_under: &[f64],
    top_scores: usize,
) -> Result<Markets, MarketError> {
    let home_win = PricedOutcome::gather(Outcome::Win(Side::Home), scoregrid);
    let draw = PricedOutcome::gather(Outcome::Draw, scoregrid);
    let away_win = PricedOutcome::gather(Outcome::Win(Side::Away), scoregrid);
    let three_way = home_win.prob + draw.prob + away_win.prob;
    if (three_way - 1.0).abs() > SUM_TOLERANCE {
        return Err(MarketError::Unbalanced(three_way));
    }

    let goals = over_under
        .iter()
        .map(|&line| GoalsMarket {
            line: Line(line),
            over: PricedOutcome::gather(Outcome::GoalsOver(Line(line)), scoregrid),
            under: PricedOutcome::gather(Outcome::GoalsUnder(Line(line)), scoregrid),
        })
        .collect();

    let markets = Markets {
        home_win,
        draw,
        away_win,
        goals,
        both_score: PricedOutcome::gather(Outcome::BothScore(true), scoregrid),
        not_both_score: PricedOutcome::gather(Outcome::BothScore(false), scoregrid),
        correct_scores: most_likely_scores(scoregrid, top_scores),
    };
    if let Some(priced) = markets
        .outcomes()
        .find(|priced| !(0.0..=1.0 + SUM_TOLERANCE).contains(&priced.prob))
    {
        return Err(MarketError::ProbOutOfRange {
            outcome: priced.outcome.clone(),
            prob: priced.prob,
        });
    }
    Ok(markets)
}

/// The `n` most probable scores. Ties are broken by the lower total, then by fewer home goals.
pub fn most_likely_scores(scoregrid: &Scoregrid, n: usize) -> Vec<PricedOutcome> {
    let mut cells: Vec<(Score, f64)> = scoregrid.cells().collect();
    cells.sort_by(|(a_score, a_prob), (b_score, b_prob)| {
        b_prob
            .total_cmp(a_prob)
            .then_with(|| a_score.total().cmp(&b_score.total()))
            .then_with(|| a_score.home.cmp(&b_score.home))
    });
    cells
        .into_iter()
        .take(n)
        .map(|(score, prob)| PricedOutcome {
            outcome: Outcome::CorrectScore(score),
            prob,
            price: FairPrice::from_prob(prob),
        })
        .collect()
}
