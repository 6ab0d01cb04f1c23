/// Probability of exactly `k` goals given a Poisson `lambda`.
///
/// Computed by recurrence on `P(k) = P(k - 1) · λ / k`, which avoids large factorials.
#[inline]
pub fn univariate(k: u8, lambda: f64) -> f64 {
    let mut prob = f64::exp(-lambda);
    for i in 1..=k {
        prob *= lambda / i as f64;
    }
    prob
}

/// Populates `probs` with `P(0), P(1), ..., P(probs.len() - 1)` for the given `lambda`.
pub fn fill(lambda: f64, probs: &mut [f64]) {
    let mut prob = f64::exp(-lambda);
    for (k, slot) in probs.iter_mut().enumerate() {
        if k > 0 {
            prob *= lambda / k as f64;
        }
        *slot = prob;
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use crate::probs::SliceExt;

    use super::*;

    #[test]
    pub fn test_univariate() {
        assert_float_relative_eq!(0.36787944117144233, univariate(0, 1.0), 1e-12);
        assert_float_relative_eq!(0.36787944117144233, univariate(1, 1.0), 1e-12);
        assert_float_relative_eq!(0.18393972058572117, univariate(2, 1.0), 1e-12);
        assert_float_relative_eq!(0.0820849986238988, univariate(0, 2.5), 1e-12);
        assert_float_relative_eq!(0.205212496559747, univariate(1, 2.5), 1e-12);
        assert_float_relative_eq!(0.25651562069968376, univariate(2, 2.5), 1e-12);
    }

    #[test]
    pub fn fill_matches_univariate() {
        let mut probs = [0.0; 10];
        fill(1.7, &mut probs);
        for (k, &prob) in probs.iter().enumerate() {
            assert_float_relative_eq!(univariate(k as u8, 1.7), prob, 1e-12);
        }
    }

    #[test]
    pub fn fill_nearly_exhausts_mass() {
        let mut probs = [0.0; 20];
        fill(2.0, &mut probs);
        assert_float_absolute_eq!(1.0, probs.sum(), 1e-9);
    }
}
