use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::error::{Result, SharingError};
use crate::field::PrimeField;
use crate::reconstruct::interpolate;
use crate::sss::{Dealer, MemberId, Share};

/// The live shares of a sharing group together with the dealer that can
/// mint more of them.
///
/// Invariants: `size() >= threshold()`, indices are distinct and nonzero,
/// and `shares()` is ordered by index.
///
/// A `Group` carries the secret polynomial. Every clone is another copy of
/// it in memory, so governance mutates the group in place instead.
#[derive(Clone, Debug)]
pub struct Group {
    dealer: Dealer,
    shares: Vec<Share>,
}

/// Validates `modulus` and splits `secret` into a fresh group.
pub fn create_group<R: RngCore + CryptoRng>(
    secret: &BigUint,
    share_count: usize,
    threshold: usize,
    modulus: &BigUint,
    rng: &mut R,
) -> Result<Group> {
    let field = PrimeField::new(modulus.clone())?;
    Group::new(secret, share_count, threshold, &field, rng)
}

impl Group {
    pub fn new<R: RngCore + CryptoRng>(
        secret: &BigUint,
        share_count: usize,
        threshold: usize,
        field: &PrimeField,
        rng: &mut R,
    ) -> Result<Self> {
        let (dealer, shares) = Dealer::split(secret, share_count, threshold, field, rng)?;
        Ok(Group { dealer, shares })
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.shares.iter().map(|s| s.index)
    }

    pub fn share_of(&self, member: MemberId) -> Option<&Share> {
        self.shares.iter().find(|s| s.index == member)
    }

    pub fn is_member(&self, member: MemberId) -> bool {
        self.share_of(member).is_some()
    }

    pub fn size(&self) -> usize {
        self.shares.len()
    }

    pub fn threshold(&self) -> usize {
        self.dealer.threshold()
    }

    pub fn field(&self) -> &PrimeField {
        self.dealer.field()
    }

    /// Interpolates the secret from the group's own live shares.
    pub fn reconstruct(&self) -> Result<BigUint> {
        interpolate(&self.shares, self.threshold(), self.field())
    }

    /// Resolves who leaves: the named member, or the oldest (smallest index).
    pub(crate) fn eviction_target(&self, requested: Option<MemberId>) -> Result<MemberId> {
        match requested {
            Some(member) if self.is_member(member) => Ok(member),
            Some(member) => Err(SharingError::UnknownMember(member)),
            None => self
                .member_ids()
                .min()
                .ok_or(SharingError::InsufficientShares {
                    provided: 0,
                    required: self.threshold(),
                }),
        }
    }

    pub(crate) fn evict(&mut self, member: MemberId) -> Result<()> {
        let position = self
            .shares
            .iter()
            .position(|s| s.index == member)
            .ok_or(SharingError::UnknownMember(member))?;
        self.shares.remove(position);
        Ok(())
    }

    /// Mints a share on the group polynomial at a never-used index.
    /// Fails without touching the group.
    pub(crate) fn admit(&mut self) -> Result<Share> {
        let share = self.dealer.next_share()?;
        self.shares.push(share.clone());
        Ok(share)
    }

    /// Admits a member at a caller-chosen index above every index issued so far.
    pub fn issue_additional_share(&mut self, index: MemberId) -> Result<Share> {
        let share = self.dealer.issue_additional_share(index)?;
        self.shares.push(share.clone());
        Ok(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const MODULUS: u32 = 7919;

    fn group(n: usize, k: usize) -> Group {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        create_group(&BigUint::from(42u32), n, k, &BigUint::from(MODULUS), &mut rng).unwrap()
    }

    #[test]
    fn test_create_group() {
        let g = group(5, 3);
        assert_eq!(g.size(), 5);
        assert_eq!(g.threshold(), 3);
        assert_eq!(g.member_ids().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(g.reconstruct().unwrap(), BigUint::from(42u32));
    }

    #[test]
    fn test_create_group_errors() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let secret = BigUint::from(42u32);

        assert!(matches!(
            create_group(&secret, 2, 3, &BigUint::from(MODULUS), &mut rng),
            Err(SharingError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            create_group(&secret, 5, 3, &BigUint::from(41u32), &mut rng),
            Err(SharingError::ModulusTooSmall { .. })
        ));
        assert!(matches!(
            create_group(&secret, 5, 3, &BigUint::from(7917u32), &mut rng),
            Err(SharingError::ModulusNotPrime(_))
        ));
    }

    #[test]
    fn test_eviction_target() {
        let g = group(5, 3);
        assert_eq!(g.eviction_target(None), Ok(1));
        assert_eq!(g.eviction_target(Some(4)), Ok(4));
        assert_eq!(g.eviction_target(Some(9)), Err(SharingError::UnknownMember(9)));
    }

    #[test]
    fn test_evict_and_admit_keep_secret() {
        let mut g = group(4, 3);
        g.evict(2).unwrap();
        let admitted = g.admit().unwrap();

        assert_eq!(admitted.index, 5);
        assert_eq!(g.member_ids().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
        assert_eq!(g.share_of(5), Some(&admitted));
        assert!(!g.is_member(2));
        assert_eq!(g.reconstruct().unwrap(), BigUint::from(42u32));
        assert_eq!(g.evict(2), Err(SharingError::UnknownMember(2)));
    }

    #[test]
    fn test_issue_additional_share_at_chosen_index() {
        let mut g = group(3, 2);
        let share = g.issue_additional_share(9).unwrap();

        assert_eq!(share.index, 9);
        assert_eq!(g.member_ids().collect::<Vec<_>>(), vec![1, 2, 3, 9]);
        assert_eq!(g.issue_additional_share(3), Err(SharingError::DuplicateIndex(3)));
        assert_eq!(g.size(), 4);

        let pair = vec![g.shares()[0].clone(), share];
        assert_eq!(interpolate(&pair, 2, g.field()).unwrap(), BigUint::from(42u32));
    }
}
