use serde::{Deserialize, Serialize};

use crate::error::{Result, SharingError};
use crate::governor::ProposalKind;

/// Relative slack for f64 products that overshoot an integer by rounding noise.
const ROUNDING_SLACK: f64 = 4.0 * f64::EPSILON;

/// Voting thresholds that gate membership changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct GovernanceParams {
    /// Yes votes needed to replace a member (`r`).
    pub replace_threshold: usize,
    /// Yes votes needed to admit a member (`p`).
    pub add_threshold: usize,
    /// Fraction of the current group that must approve a removal (`m`).
    pub removal_fraction: f64,
}

#[derive(Deserialize)]
struct RawParams {
    replace_threshold: usize,
    add_threshold: usize,
    removal_fraction: f64,
}

impl TryFrom<RawParams> for GovernanceParams {
    type Error = SharingError;

    fn try_from(raw: RawParams) -> Result<Self> {
        GovernanceParams::new(raw.replace_threshold, raw.add_threshold, raw.removal_fraction)
    }
}

impl GovernanceParams {
    pub fn new(replace_threshold: usize, add_threshold: usize, removal_fraction: f64) -> Result<Self> {
        if replace_threshold == 0 {
            return Err(SharingError::InvalidParameters(
                "replace threshold must be at least 1".to_string(),
            ));
        }
        if add_threshold == 0 {
            return Err(SharingError::InvalidParameters(
                "add threshold must be at least 1".to_string(),
            ));
        }
        if !(removal_fraction > 0.0 && removal_fraction <= 1.0) {
            return Err(SharingError::InvalidParameters(format!(
                "removal fraction {} is outside (0, 1]",
                removal_fraction
            )));
        }

        Ok(GovernanceParams {
            replace_threshold,
            add_threshold,
            removal_fraction,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SharingError::InvalidParameters(e.to_string()))
    }

    /// Yes votes required for `kind` in a group of `group_size` members.
    pub fn threshold_for(&self, kind: &ProposalKind, group_size: usize) -> usize {
        match kind {
            ProposalKind::Replace { .. } => self.replace_threshold,
            ProposalKind::Add => self.add_threshold,
            ProposalKind::Remove { .. } => {
                // 0.07 * 100 is 7.000000000000001 in f64, which must stay 7
                let exact = self.removal_fraction * group_size as f64;
                let nearest = exact.round();
                let required = if exact > nearest && exact - nearest <= ROUNDING_SLACK * nearest {
                    nearest
                } else {
                    exact.ceil()
                };
                (required as usize).max(1)
            }
        }
    }
}
