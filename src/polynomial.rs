use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::field::PrimeField;

/// Secret-encoding polynomial. Coefficient 0 is the secret.
///
/// Never serialized, and `Debug` only reveals the degree.
#[derive(Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Samples `secret + a_1 x + ... + a_degree x^degree` with every `a_i`
    /// drawn uniformly from `[1, p - 1]`.
    pub fn generate<R: RngCore + CryptoRng>(
        secret: &BigUint,
        degree: usize,
        field: &PrimeField,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(field.reduce(secret));
        coefficients.extend((0..degree).map(|_| field.random_element(rng)));
        Polynomial { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation in the field.
    pub fn evaluate(&self, x: &BigUint, field: &PrimeField) -> BigUint {
        self.coefficients
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, c| field.add(&field.mul(&acc, x), c))
    }

    #[cfg(test)]
    pub(crate) fn from_coefficients(coefficients: Vec<BigUint>) -> Self {
        Polynomial { coefficients }
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polynomial")
            .field("degree", &self.degree())
            .finish_non_exhaustive()
    }
}
