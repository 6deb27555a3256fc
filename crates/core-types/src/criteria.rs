use displaydoc::Display;
use serde::{Deserialize, Serialize};

use crate::serde_utils::{u128_from_anything, u32_from_anything};

/// Denominator of a `Perbill` commission.
pub const COMMISSION_DENOMINATOR: u32 = 1_000_000_000;

/// Base units per token.
pub const UNIT: u128 = 1_000_000_000;

/// Highest commission still considered healthy (5%).
pub const DEFAULT_MAX_COMMISSION: u32 = 50_000_000;

/// Nominator count at which a validator counts as over-subscribed.
///
/// Kept below the runtime's own cap of 256 rewarded nominators.
pub const DEFAULT_MAX_NOMINATORS: u32 = 220;

/// Minimum self-bonded stake.
pub const DEFAULT_MIN_OWN_STAKE: u128 = 10_000 * UNIT;

/// A reason for leaving a validator out of the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Exclusion {
    /// not active in the current era
    NotActive,
    /// blocks new nominations
    BlockedNominations,
    /// commission above the healthy maximum
    UnhealthyCommission,
    /// too many nominators
    OverSubscribed,
    /// self-bonded stake below the minimum
    UnhealthyOwnStake,
    /// slashed before
    SlashedBefore,
}

impl Exclusion {
    pub const ALL: [Exclusion; 6] = [
        Exclusion::NotActive,
        Exclusion::BlockedNominations,
        Exclusion::UnhealthyCommission,
        Exclusion::OverSubscribed,
        Exclusion::UnhealthyOwnStake,
        Exclusion::SlashedBefore,
    ];

    /// Short snake-case name, used as a metric label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Exclusion::NotActive => "not_active",
            Exclusion::BlockedNominations => "blocked_nominations",
            Exclusion::UnhealthyCommission => "unhealthy_commission",
            Exclusion::OverSubscribed => "over_subscribed",
            Exclusion::UnhealthyOwnStake => "unhealthy_own_stake",
            Exclusion::SlashedBefore => "slashed_before",
        }
    }
}

/// Thresholds applied by the eligibility filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    /// Commissions strictly above this value are excluded.
    #[serde(deserialize_with = "u32_from_anything")]
    pub max_commission: u32,

    /// Validators with this many nominators or more are excluded.
    #[serde(deserialize_with = "u32_from_anything")]
    pub max_nominators: u32,

    /// Validators with strictly less self stake are excluded.
    #[serde(
        deserialize_with = "u128_from_anything",
        serialize_with = "serialize_u128_as_string"
    )]
    pub min_own_stake: u128,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            max_commission: DEFAULT_MAX_COMMISSION,
            max_nominators: DEFAULT_MAX_NOMINATORS,
            min_own_stake: DEFAULT_MIN_OWN_STAKE,
        }
    }
}

// TOML integers are i64, so large balances are written out as strings.
fn serialize_u128_as_string<S: serde::Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}
