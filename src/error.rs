use num_bigint::BigUint;
use thiserror::Error;

use crate::MemberId;

pub type Result<T> = std::result::Result<T, SharingError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharingError {
    #[error("invalid threshold: k = {threshold} must satisfy 1 <= k <= n = {share_count}")]
    InvalidThreshold { threshold: usize, share_count: usize },
    #[error("modulus {modulus} is too small, it must exceed {required}")]
    ModulusTooSmall { modulus: BigUint, required: BigUint },
    #[error("modulus {0} is not prime")]
    ModulusNotPrime(BigUint),
    #[error("insufficient shares: {provided} provided, {required} required")]
    InsufficientShares { provided: usize, required: usize },
    #[error("duplicate share index {0}")]
    DuplicateIndex(MemberId),
    #[error("invalid share index {0}")]
    InvalidShareIndex(MemberId),
    #[error("division by zero in the field")]
    DivisionByZero,
    #[error("removing a member would leave {remaining} shares, below threshold {threshold}")]
    MembershipInvariantViolated { remaining: usize, threshold: usize },
    #[error("member {0} holds no live share")]
    UnknownMember(MemberId),
    #[error("invalid governance parameters: {0}")]
    InvalidParameters(String),
}
