//! Display names from the identity pallet.
//!
//! An account either declares its own identity, or is a sub-account of a
//! parent identity, in which case its name is rendered `parent/sub`.

use tracing::warn;

use stakepick_core_types::{AccountId, DisplayData, IdentityRecord, Lookup, SuperOfRecord, Table};

/// Rendering of a sub-name explicitly set to `None`.
pub const NONE_SUB_NAME: &str = "None";

/// Decode display bytes as UTF-8.
///
/// Invalid UTF-8 falls back to the `0x`-prefixed hex of the raw bytes, so a
/// single broken identity never aborts a run.
pub fn decode_display(account_id: &AccountId, bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(name) => name.to_string(),
        Err(e) => {
            warn!(%account_id, error = %e, "Display name is not valid UTF-8, using hex");
            format!("0x{}", hex::encode(bytes))
        }
    }
}

/// Resolves display names against an identity snapshot.
#[derive(Copy, Clone, Debug)]
pub struct IdentityResolver<'a> {
    identities: &'a Table<IdentityRecord>,
    super_of: &'a Table<SuperOfRecord>,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(identities: &'a Table<IdentityRecord>, super_of: &'a Table<SuperOfRecord>) -> Self {
        Self {
            identities,
            super_of,
        }
    }

    /// The display name the account declared for itself, if any.
    pub fn own_display_name(&self, account_id: &AccountId) -> Option<String> {
        match self.identities.lookup(account_id) {
            Lookup::Found(identity) => identity
                .display_name_bytes()
                .map(|bytes| decode_display(account_id, bytes)),
            Lookup::Absent => None,
        }
    }

    /// The display name of the account, falling back to its parent identity.
    ///
    /// Only one level of delegation is followed: the parent's own identity is
    /// used, never the parent's parent.
    pub fn display_name(&self, account_id: &AccountId) -> Option<String> {
        if let Some(name) = self.own_display_name(account_id) {
            return Some(name);
        }

        let super_of = match self.super_of.lookup(account_id) {
            Lookup::Found(super_of) => super_of,
            Lookup::Absent => return None,
        };

        let sub_name = match &super_of.sub_name {
            DisplayData::None => NONE_SUB_NAME.to_string(),
            DisplayData::Bytes(bytes) => decode_display(account_id, bytes),
        };

        let super_name = self.own_display_name(&super_of.parent).unwrap_or_default();

        Some(format!("{super_name}/{sub_name}"))
    }
}

/// Resolve the display name of `account_id`.
pub fn resolve_display_name(
    account_id: &AccountId,
    identities: &Table<IdentityRecord>,
    super_of: &Table<SuperOfRecord>,
) -> Option<String> {
    IdentityResolver::new(identities, super_of).display_name(account_id)
}
