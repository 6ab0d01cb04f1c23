use thiserror::Error;

use crate::config::VALID_SCORE_CAP;

/// A numeric parameter outside of its valid domain, either from configuration or derived from it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidParameter {
    #[error("strength weight {0} outside of (0, 1]")]
    StrengthWeight(f64),

    #[error("score cap {0} outside of {min}..={max}", min = VALID_SCORE_CAP.start(), max = VALID_SCORE_CAP.end())]
    ScoreCap(usize),

    #[error("expected goals for {side} must be strictly positive, got {value}")]
    Lambda { side: crate::domain::Side, value: f64 },

    #[error("Dixon-Coles adjustment for {}-{} is negative (τ={tau:.6}, ρ={rho})", cell.0, cell.1)]
    NegativeAdjustment {
        cell: (usize, usize),
        tau: f64,
        rho: f64,
    },

    #[error("scoregrid cell ({}, {}) holds {value}, outside of [0, 1]", cell.0, cell.1)]
    CellOutOfRange { cell: (usize, usize), value: f64 },

    #[error("scoregrid sums to {0} after renormalisation")]
    Unnormalised(f64),
}
