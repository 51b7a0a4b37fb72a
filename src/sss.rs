use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SharingError};
use crate::field::PrimeField;
use crate::polynomial::Polynomial;

/// Identity of a group member, which is also the x-coordinate of their share.
pub type MemberId = u64;

/// One point `(index, f(index))` on the group polynomial.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Share {
    pub index: MemberId,
    pub value: BigUint,
}

impl Share {
    pub fn new(index: MemberId, value: BigUint) -> Self {
        Share { index, value }
    }
}

/// Holds the group polynomial for the lifetime of the group so that every
/// share minted later lies on the same polynomial as the original ones.
///
/// Indices are handed out in increasing order and never reused, so an
/// evicted member's share is never re-issued to somebody else.
#[derive(Clone, Debug)]
pub struct Dealer {
    field: PrimeField,
    polynomial: Polynomial,
    next_index: MemberId,
}

impl Dealer {
    /// Samples a fresh polynomial for `secret` and issues shares at `1..=n`.
    pub fn split<R: RngCore + CryptoRng>(
        secret: &BigUint,
        share_count: usize,
        threshold: usize,
        field: &PrimeField,
        rng: &mut R,
    ) -> Result<(Dealer, Vec<Share>)> {
        if threshold < 1 || threshold > share_count {
            return Err(SharingError::InvalidThreshold {
                threshold,
                share_count,
            });
        }

        let largest = [
            secret.clone(),
            BigUint::from(share_count),
            BigUint::from(threshold),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        if !field.contains(&largest) {
            return Err(SharingError::ModulusTooSmall {
                modulus: field.modulus().clone(),
                required: largest,
            });
        }

        let polynomial = Polynomial::generate(secret, threshold - 1, field, rng);
        let mut dealer = Dealer {
            field: field.clone(),
            polynomial,
            next_index: 1,
        };
        let shares = (0..share_count)
            .map(|_| dealer.next_share())
            .collect::<Result<Vec<_>>>()?;

        Ok((dealer, shares))
    }

    /// Evaluates the group polynomial at a fresh index.
    ///
    /// Fails with `DuplicateIndex` if `index` was issued before (or skipped
    /// over), and with `ModulusTooSmall` if it is not a field element.
    pub fn issue_additional_share(&mut self, index: MemberId) -> Result<Share> {
        if index == 0 || index == MemberId::MAX {
            return Err(SharingError::InvalidShareIndex(index));
        }
        if index < self.next_index {
            return Err(SharingError::DuplicateIndex(index));
        }

        let x = BigUint::from(index);
        if !self.field.contains(&x) {
            return Err(SharingError::ModulusTooSmall {
                modulus: self.field.modulus().clone(),
                required: x,
            });
        }

        self.next_index = index + 1;
        let value = self.polynomial.evaluate(&x, &self.field);
        Ok(Share { index, value })
    }

    /// Mints a share at the smallest index never issued before.
    pub fn next_share(&mut self) -> Result<Share> {
        self.issue_additional_share(self.next_index)
    }

    pub fn threshold(&self) -> usize {
        self.polynomial.degree() + 1
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn next_index(&self) -> MemberId {
        self.next_index
    }
}

/// One-shot split: the polynomial is dropped as soon as the shares exist.
pub fn split<R: RngCore + CryptoRng>(
    secret: &BigUint,
    share_count: usize,
    threshold: usize,
    field: &PrimeField,
    rng: &mut R,
) -> Result<Vec<Share>> {
    let (_, shares) = Dealer::split(secret, share_count, threshold, field, rng)?;
    Ok(shares)
}
