//! Numeric value generators.

use crate::error::GeneratorError;
use rand::Rng;

/// Generate a random integer in `[from, to)`.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, from: i64, to: i64) -> Result<i64, GeneratorError> {
    if to <= from {
        return Err(GeneratorError::EmptyIntRange { from, to });
    }
    Ok(rng.gen_range(from..to))
}

/// Generate a random float in `[from, to)`.
pub fn rand_float<R: Rng + ?Sized>(rng: &mut R, from: f64, to: f64) -> Result<f64, GeneratorError> {
    if !(from.is_finite() && to.is_finite() && to > from && (to - from).is_finite()) {
        return Err(GeneratorError::InvalidFloatRange { from, to });
    }
    Ok(rng.gen_range(from..to))
}

/// Generate a decimal digit in `0..10`.
pub fn rand_digit<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(0..10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rand_int_covers_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 10];

        for _ in 0..1000 {
            let v = rand_int(&mut rng, 10, 20).unwrap();
            assert!((10..20).contains(&v));
            seen[(v - 10) as usize] = true;
        }

        assert!(seen.iter().all(|s| *s), "not every value was drawn: {seen:?}");
    }

    #[test]
    fn test_rand_int_empty_range() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            rand_int(&mut rng, 5, 5),
            Err(GeneratorError::EmptyIntRange { from: 5, to: 5 })
        );
        assert!(rand_int(&mut rng, 9, 1).is_err());
    }

    #[test]
    fn test_rand_float_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let v = rand_float(&mut rng, 0.0, 100.0).unwrap();
            assert!((0.0..100.0).contains(&v));
        }
    }

    #[test]
    fn test_rand_float_invalid_range() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(rand_float(&mut rng, 1.0, 1.0).is_err());
        assert!(rand_float(&mut rng, 0.0, f64::INFINITY).is_err());
        assert!(rand_float(&mut rng, f64::NAN, 1.0).is_err());
        assert!(rand_float(&mut rng, -f64::MAX, f64::MAX).is_err());
    }

    proptest! {
        #[test]
        fn prop_rand_int_within_bounds(seed: u64, from in -1_000_000i64..1_000_000, width in 1i64..1_000_000) {
            let mut rng = StdRng::seed_from_u64(seed);
            let v = rand_int(&mut rng, from, from + width).unwrap();
            prop_assert!(v >= from && v < from + width);
        }

        #[test]
        fn prop_rand_digit_is_decimal(seed: u64) {
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert!(rand_digit(&mut rng) < 10);
        }
    }
}
