//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Scales the elements so that they add up to `target`, returning the sum prior to scaling.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        self.scale(target / sum);
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use crate::testing::assert_slice_f64_near;

    use super::*;

    #[test]
    fn sum() {
        let data = [0.0, 0.1, 0.2];
        assert_f64_near!(0.3, data.sum(), 1);
    }

    #[test]
    fn normalise() {
        let mut data = [1.0, 2.0, 3.0, 2.0];
        let sum = data.normalise(1.0);
        assert_eq!(8.0, sum);
        assert_slice_f64_near(&[0.125, 0.25, 0.375, 0.25], &data, 1);
    }

    #[test]
    fn scale() {
        let mut data = [1.0, 2.0, 4.0];
        data.scale(0.5);
        assert_eq!([0.5, 1.0, 2.0], data);
    }
}
