use rand::{Rng, RngCore};
use rand_distr::{Exp1, StandardNormal};

use crate::GymError;

/// An axis-aligned box in `R^n`, possibly unbounded on either side.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoxSpace {
    /// # Errors
    ///
    /// Returns [`GymError::InvalidSpace`] when the bounds differ in length,
    /// contain NaN, have `low > high` in some dimension, or pin a dimension
    /// to an infinite point.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self, GymError> {
        if low.len() != high.len() {
            return Err(GymError::InvalidSpace(format!(
                "{} lower bounds but {} upper bounds",
                low.len(),
                high.len()
            )));
        }
        for (dim, (l, h)) in low.iter().zip(&high).enumerate() {
            let pinned_at_infinity = l.is_infinite()
                && h.is_infinite()
                && l.is_sign_positive() == h.is_sign_positive();
            if l.is_nan() || h.is_nan() || l > h || pinned_at_infinity {
                return Err(GymError::InvalidSpace(format!(
                    "dimension {dim} has bounds [{l}, {h}]"
                )));
            }
        }
        Ok(Self { low, high })
    }

    /// The same `[low, high]` interval in each of `dim` dimensions.
    ///
    /// # Errors
    ///
    /// See [`BoxSpace::new`].
    pub fn uniform(low: f64, high: f64, dim: usize) -> Result<Self, GymError> {
        Self::new(vec![low; dim], vec![high; dim])
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn shape(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.shape()
            && values
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (l, h))| l <= v && v <= h)
    }

    /// Draws a point inside the box.
    ///
    /// Bounded dimensions are sampled uniformly, half-bounded ones from a
    /// shifted exponential, and unbounded ones from a standard normal.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&low, &high)| match (low.is_finite(), high.is_finite()) {
                (true, true) if (high - low).is_finite() => rng.gen_range(low..=high),
                (true, true) => {
                    // The width overflows, so blend the bounds instead.
                    let t: f64 = rng.gen();
                    (low * (1.0 - t) + high * t).clamp(low, high)
                }
                (true, false) => low + rng.sample::<f64, _>(Exp1),
                (false, true) => high - rng.sample::<f64, _>(Exp1),
                (false, false) => rng.sample(StandardNormal),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn rejects_inconsistent_bounds() {
        assert!(BoxSpace::new(vec![0.0], vec![1.0, 2.0]).is_err());
        assert!(BoxSpace::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoxSpace::new(vec![f64::NAN], vec![0.0]).is_err());
        assert!(BoxSpace::new(vec![f64::INFINITY], vec![f64::INFINITY]).is_err());
        assert!(BoxSpace::new(vec![f64::NEG_INFINITY], vec![f64::NEG_INFINITY]).is_err());
    }

    #[test]
    fn contains_checks_shape_and_bounds() {
        let space = BoxSpace::new(vec![0.0, 0.0], vec![1.0, f64::INFINITY]).unwrap();
        assert!(space.contains(&[0.5, 1e9]));
        assert!(space.contains(&[1.0, 0.0]));
        assert!(!space.contains(&[1.5, 0.0]));
        assert!(!space.contains(&[0.5]));
    }

    #[test]
    fn samples_stay_inside() {
        let space = BoxSpace::new(
            vec![-1.0, 0.0, f64::NEG_INFINITY, f64::NEG_INFINITY, 2.0],
            vec![1.0, f64::INFINITY, 5.0, f64::INFINITY, 2.0],
        )
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let point = space.sample(&mut rng);
            assert!(space.contains(&point), "{point:?}");
            assert_eq!(point[4], 2.0);
        }
    }

    #[test]
    fn samples_the_full_float_range_without_overflow() {
        let space = BoxSpace::uniform(-f64::MAX, f64::MAX, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let point = space.sample(&mut rng);
            assert!(point.iter().all(|v| v.is_finite()), "{point:?}");
            assert!(space.contains(&point));
        }
    }
}
