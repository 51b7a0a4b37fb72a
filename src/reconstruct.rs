use std::collections::HashSet;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Result, SharingError};
use crate::field::PrimeField;
use crate::sss::Share;

/// Recovers the secret from at least `threshold` shares.
///
/// The whole input is checked for zero, out-of-field and duplicate indices.
/// Interpolation then runs over the first `threshold` shares; any other
/// `threshold`-subset of an honest group yields the same value.
/// Forged or corrupted shares are not detected.
pub fn interpolate(shares: &[Share], threshold: usize, field: &PrimeField) -> Result<BigUint> {
    if threshold == 0 {
        return Err(SharingError::InvalidThreshold {
            threshold,
            share_count: shares.len(),
        });
    }
    if shares.len() < threshold {
        return Err(SharingError::InsufficientShares {
            provided: shares.len(),
            required: threshold,
        });
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if share.index == 0 {
            return Err(SharingError::InvalidShareIndex(share.index));
        }
        if !field.contains(&BigUint::from(share.index)) {
            return Err(SharingError::ModulusTooSmall {
                modulus: field.modulus().clone(),
                required: BigUint::from(share.index),
            });
        }
        if !seen.insert(share.index) {
            return Err(SharingError::DuplicateIndex(share.index));
        }
    }

    let subset = &shares[..threshold];
    let points: Vec<BigUint> = subset.iter().map(|s| BigUint::from(s.index)).collect();
    let values: Vec<BigUint> = subset.iter().map(|s| field.reduce(&s.value)).collect();

    lagrange_interpolation_at_zero(&points, &values, field)
}

/// Value at x = 0 of the unique polynomial through `(points[j], values[j])`.
///
/// `points` must be distinct; a repeated point surfaces as `DivisionByZero`.
///
/// # Panics
///
/// Panics if `points` and `values` differ in length.
pub fn lagrange_interpolation_at_zero(
    points: &[BigUint],
    values: &[BigUint],
    field: &PrimeField,
) -> Result<BigUint> {
    assert_eq!(points.len(), values.len());

    let mut acc = BigUint::zero();
    for (j, (xj, yj)) in points.iter().zip(values).enumerate() {
        let mut num = BigUint::one();
        let mut den = BigUint::one();

        for (m, xm) in points.iter().enumerate() {
            if m != j {
                num = field.mul(&num, &field.neg(xm));
                den = field.mul(&den, &field.sub(xj, xm));
            }
        }

        let term = field.mul(&field.mul(yj, &num), &field.inverse(&den)?);
        acc = field.add(&acc, &term);
    }

    Ok(acc)
}

/// Parses the modulus and interpolates.
pub fn reconstruct(shares: &[Share], threshold: usize, modulus: &BigUint) -> Result<BigUint> {
    let field = PrimeField::new(modulus.clone())?;
    interpolate(shares, threshold, &field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sss::split;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn field() -> PrimeField {
        PrimeField::new(BigUint::from(7919u32)).unwrap()
    }

    fn share(index: u64, value: u32) -> Share {
        Share::new(index, BigUint::from(value))
    }

    #[test]
    fn test_interpolates_known_line() {
        // f(x) = 10 + 3x
        let shares = vec![share(1, 13), share(4, 22)];
        assert_eq!(
            interpolate(&shares, 2, &field()).unwrap(),
            BigUint::from(10u32)
        );
    }

    #[test]
    fn test_all_subsets_agree() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let secret = BigUint::from(4321u32);
        let shares = split(&secret, 5, 3, &field(), &mut rng).unwrap();

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = vec![shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(interpolate(&subset, 3, &field()).unwrap(), secret);
                }
            }
        }
    }

    #[test]
    fn test_insufficient_shares() {
        let shares = vec![share(1, 13), share(2, 16)];
        assert_eq!(
            interpolate(&shares, 3, &field()),
            Err(SharingError::InsufficientShares {
                provided: 2,
                required: 3
            })
        );
        assert!(matches!(
            interpolate(&[], 0, &field()),
            Err(SharingError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_duplicate_index() {
        let shares = vec![share(1, 13), share(3, 19), share(1, 13)];
        assert_eq!(
            interpolate(&shares, 2, &field()),
            Err(SharingError::DuplicateIndex(1))
        );
    }

    #[test]
    fn test_zero_and_oversized_indices() {
        let shares = vec![share(0, 13), share(2, 16)];
        assert_eq!(
            interpolate(&shares, 2, &field()),
            Err(SharingError::InvalidShareIndex(0))
        );

        let shares = vec![share(1, 13), share(7919, 16)];
        assert_eq!(
            interpolate(&shares, 2, &field()),
            Err(SharingError::ModulusTooSmall {
                modulus: BigUint::from(7919u32),
                required: BigUint::from(7919u32),
            })
        );
    }

    #[test]
    fn test_repeated_point_is_division_by_zero() {
        let points = vec![BigUint::from(2u32), BigUint::from(2u32)];
        let values = vec![BigUint::from(5u32), BigUint::from(5u32)];
        assert_eq!(
            lagrange_interpolation_at_zero(&points, &values, &field()),
            Err(SharingError::DivisionByZero)
        );
    }

    #[test]
    fn test_reconstruct_validates_modulus() {
        let shares = vec![share(1, 13), share(4, 22)];
        assert_eq!(
            reconstruct(&shares, 2, &BigUint::from(7919u32)).unwrap(),
            BigUint::from(10u32)
        );
        assert!(matches!(
            reconstruct(&shares, 2, &BigUint::from(7917u32)),
            Err(SharingError::ModulusNotPrime(_))
        ));
    }
}
