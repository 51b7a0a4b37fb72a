use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SharingError};

const PRIMALITY_ROUNDS: usize = 20;

/// The prime field Z_p every share, coefficient and secret lives in.
///
/// Operands are reduced modulo p on entry, so callers may pass any
/// non-negative integer. Results are always canonical (in `[0, p)`).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "BigUint", into = "BigUint")]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus < BigUint::from(2u32) {
            return Err(SharingError::ModulusNotPrime(modulus));
        }
        let candidate = num_bigint_dig::BigUint::from_bytes_be(&modulus.to_bytes_be());
        if !num_bigint_dig::prime::probably_prime(&candidate, PRIMALITY_ROUNDS) {
            return Err(SharingError::ModulusNotPrime(modulus));
        }
        Ok(PrimeField { modulus })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// True if `value` is already a canonical element of the field.
    pub fn contains(&self, value: &BigUint) -> bool {
        value < &self.modulus
    }

    pub fn reduce(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    pub fn element(&self, value: u64) -> BigUint {
        self.reduce(&BigUint::from(value))
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (self.reduce(a) + &self.modulus - self.reduce(b)) % &self.modulus
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    pub fn neg(&self, a: &BigUint) -> BigUint {
        (&self.modulus - self.reduce(a)) % &self.modulus
    }

    /// Multiplicative inverse through the extended Euclidean algorithm.
    pub fn inverse(&self, a: &BigUint) -> Result<BigUint> {
        let a = self.reduce(a);
        if a.is_zero() {
            return Err(SharingError::DivisionByZero);
        }

        let p = BigInt::from_biguint(Sign::Plus, self.modulus.clone());
        let egcd = BigInt::from_biguint(Sign::Plus, a).extended_gcd(&p);
        if !egcd.gcd.is_one() {
            return Err(SharingError::DivisionByZero);
        }
        Ok(egcd.x.mod_floor(&p).magnitude().clone())
    }

    /// Uniform sample from `[1, p - 1]`.
    pub fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_range(&BigUint::one(), &self.modulus)
    }
}

impl TryFrom<BigUint> for PrimeField {
    type Error = SharingError;

    fn try_from(modulus: BigUint) -> Result<Self> {
        PrimeField::new(modulus)
    }
}

impl From<PrimeField> for BigUint {
    fn from(field: PrimeField) -> BigUint {
        field.modulus
    }
}
