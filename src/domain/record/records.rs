use std::collections::{HashMap, HashSet};

use super::{Id, SyncRecord};

/// Represents a run-local snapshot of the records of one folder, keyed
/// by record id.
pub type Records = HashMap<Id, SyncRecord>;

/// Collects a store listing into a [`Records`] snapshot. Duplicate ids
/// collapse: the last record encountered in iteration order wins.
pub fn from_listing<T>(records: T) -> Records
where
    T: IntoIterator<Item = SyncRecord>,
{
    records
        .into_iter()
        .map(|record| (record.id().to_owned(), record))
        .collect()
}

/// Projects records to the set of their ids.
pub fn identities(records: &Records) -> HashSet<Id> {
    records.keys().cloned().collect()
}

/// Returns the records whose id belongs to the given identity set.
/// Order is not significant.
pub fn filter_by_identities<'a>(ids: &HashSet<Id>, records: &'a Records) -> Vec<&'a SyncRecord> {
    records
        .values()
        .filter(|record| ids.contains(record.id()))
        .collect()
}

#[cfg(test)]
mod records {
    use std::collections::HashSet;

    use crate::{CustomFlags, Flag, Flags, SyncRecord};

    fn record(id: &str, flags: Flags) -> SyncRecord {
        SyncRecord::new(id, flags, CustomFlags::default()).unwrap()
    }

    #[test]
    fn from_listing_collapses_duplicates_last_wins() {
        let records = super::from_listing([
            record("a", Flags::default()),
            record("b", Flags::default()),
            record("a", Flags::from(Flag::Seen)),
        ]);

        assert_eq!(2, records.len());
        assert_eq!(Flags::from(Flag::Seen), records["a"].flags());
    }

    #[test]
    fn identities_of_empty_snapshot_is_empty() {
        assert_eq!(HashSet::new(), super::identities(&Default::default()));
    }

    #[test]
    fn identities_projects_ids() {
        let records = super::from_listing([
            record("a", Flags::default()),
            record("b", Flags::from(Flag::Seen)),
        ]);

        assert_eq!(
            HashSet::from(["a".to_owned(), "b".to_owned()]),
            super::identities(&records),
        );
    }

    #[test]
    fn filter_by_identities_keeps_members_only() {
        let records = super::from_listing([
            record("a", Flags::default()),
            record("b", Flags::default()),
            record("c", Flags::default()),
        ]);
        let ids = HashSet::from(["a".to_owned(), "c".to_owned(), "z".to_owned()]);

        let mut filtered: Vec<_> = super::filter_by_identities(&ids, &records)
            .into_iter()
            .map(|record| record.id().to_owned())
            .collect();
        filtered.sort();

        assert_eq!(vec!["a".to_owned(), "c".to_owned()], filtered);
    }
}
