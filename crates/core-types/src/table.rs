use std::collections::hash_map::{self, HashMap};

use crate::AccountId;

/// Result of looking up an account in a per-account table.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    Found(&'a T),
    Absent,
}

impl<'a, T> Lookup<'a, T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<&'a T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> Clone for Lookup<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Lookup<'_, T> {}

impl<'a, T> From<Option<&'a T>> for Lookup<'a, T> {
    fn from(value: Option<&'a T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::Absent,
        }
    }
}

/// A snapshot of one storage map, keyed by account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table<T> {
    entries: HashMap<AccountId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing and returning any previous one for the same account.
    pub fn insert(&mut self, account_id: AccountId, value: T) -> Option<T> {
        self.entries.insert(account_id, value)
    }

    pub fn lookup(&self, account_id: &AccountId) -> Lookup<'_, T> {
        self.entries.get(account_id).into()
    }

    pub fn contains(&self, account_id: &AccountId) -> bool {
        self.entries.contains_key(account_id)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, AccountId, T> {
        self.entries.iter()
    }
}

impl<T> FromIterator<(AccountId, T)> for Table<T> {
    fn from_iter<I: IntoIterator<Item = (AccountId, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<(AccountId, T)> for Table<T> {
    fn extend<I: IntoIterator<Item = (AccountId, T)>>(&mut self, iter: I) {
        self.entries.extend(iter)
    }
}

/// Accounts with a nonzero slash on record. Absence means "never slashed".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlashFlags(Table<()>);

impl SlashFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, account_id: AccountId) {
        self.0.insert(account_id, ());
    }

    pub fn is_slashed(&self, account_id: &AccountId) -> bool {
        self.0.contains(account_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<AccountId> for SlashFlags {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self(iter.into_iter().map(|id| (id, ())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reports_absence() {
        let present = AccountId::new([1; 32]);
        let missing = AccountId::new([2; 32]);

        let table: Table<u32> = [(present, 7)].into_iter().collect();

        assert_eq!(table.lookup(&present), Lookup::Found(&7));
        assert_eq!(table.lookup(&missing), Lookup::Absent);
        assert_eq!(table.lookup(&missing).found(), None);
    }

    #[test]
    fn slash_flags_default_to_false() {
        let slashed = AccountId::new([1; 32]);
        let flags: SlashFlags = [slashed].into_iter().collect();

        assert!(flags.is_slashed(&slashed));
        assert!(!flags.is_slashed(&AccountId::new([9; 32])));
    }
}
