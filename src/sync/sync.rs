use chrono::Utc;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{collections::HashSet, result};

use crate::{
    domain::record,
    store::BoxError,
    CacheStore, FolderKey, Id, LiveStore, Records, SyncConfig, SyncRecord, SyncStateStore,
};

use super::{refresh, Error, RefreshDecision, Result, WriteBatch};

/// Represents the events reported to the progress callback during one
/// run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SyncProgressEvent {
    GetCachedRecords,
    GetLiveRecords,
    BuildRecordsPatch,
    ProcessRecordsPatch(usize),
    ApplyDeletions(usize),
    ApplyInsertions(usize),
    ApplyUpdates(usize),
}

/// Represents one reconciliation operation against the cached folder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Hunk {
    /// The id disappeared from the live folder, its cached row is
    /// removed.
    RemoveRecord(Id),
    /// The id is new in the live folder, its detail is fetched and
    /// inserted as a new cached row.
    InsertRecord(Id),
    /// The id exists on both sides with diverging state, the cached
    /// row is rewritten from the live state.
    UpdateRecord(Id),
}

pub type Patch = Vec<Hunk>;

/// Represents the outcome of one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SyncReport {
    /// The cache has been reconciled against the live folder.
    Synchronized {
        deleted: usize,
        inserted: usize,
        updated: usize,
    },
    /// The patch has been computed but not applied.
    DryRun(Patch),
    /// The run short-circuited without touching any store.
    Skipped,
}

pub struct SyncBuilder<'a> {
    config: &'a SyncConfig,
    enforce: bool,
    dry_run: bool,
    on_progress: Box<dyn Fn(SyncProgressEvent) -> result::Result<(), BoxError> + Sync + Send + 'a>,
}

impl<'a> SyncBuilder<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self {
            config,
            enforce: false,
            dry_run: false,
            on_progress: Box::new(|_| Ok(())),
        }
    }

    /// Bypasses the refresh policy: the next run proceeds even inside
    /// the throttle window.
    pub fn enforce(mut self, enforce: bool) -> Self {
        self.enforce = enforce;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(SyncProgressEvent) -> result::Result<(), BoxError> + Sync + Send + 'a,
    {
        self.on_progress = Box::new(f);
        self
    }

    /// Reconciles the cached folder with its live counterpart.
    ///
    /// The run is a single pass: it loads both snapshots, computes the
    /// patch, then applies deletions, insertions and updates as three
    /// independent atomic batches before persisting the sync marker. A
    /// failed run leaves the marker untouched so the next invocation
    /// retries promptly; batches already committed stay committed, the
    /// next run recomputes the patch from scratch and converges.
    pub fn sync<L, C>(&self, folder: &FolderKey, live: &L, cache: &C) -> Result<SyncReport>
    where
        L: LiveStore + ?Sized,
        C: CacheStore + SyncStateStore + ?Sized,
    {
        info!("synchronizing header cache of folder {folder}");

        if !self.config.enabled {
            info!(
                "synchronization not enabled for account {}, skipping folder {folder}",
                self.config.name,
            );
            return Ok(SyncReport::Skipped);
        }

        let progress = |event: SyncProgressEvent| {
            (self.on_progress)(event).map_err(|err| Error::UnexpectedError(err, folder.clone()))
        };

        let last_sync = cache
            .last_sync(folder)
            .map_err(|err| Error::CacheReadError(err, folder.clone()))?;

        let decision = refresh::evaluate(
            self.enforce,
            self.config.refresh_interval_ms,
            last_sync,
            Utc::now(),
        );

        if let RefreshDecision::Throttled = decision {
            debug!("refresh interval of folder {folder} not elapsed, skipping");
            return Ok(SyncReport::Skipped);
        }

        progress(SyncProgressEvent::GetCachedRecords)?;

        let cached: Records = record::from_listing(
            cache
                .load_all(folder)
                .map_err(|err| Error::CacheReadError(err, folder.clone()))?,
        );

        trace!("cached records: {:#?}", cached);

        progress(SyncProgressEvent::GetLiveRecords)?;

        let live_records: Records = record::from_listing(
            live.list_minimal(folder)
                .map_err(|err| Error::RemoteReadError(err, folder.clone()))?,
        );

        trace!("live records: {:#?}", live_records);

        progress(SyncProgressEvent::BuildRecordsPatch)?;

        let patch = build_patch(&cached, &live_records);

        debug!("records patch: {:#?}", patch);

        progress(SyncProgressEvent::ProcessRecordsPatch(patch.len()))?;

        if self.dry_run {
            info!("dry run activated, skipping records patch");
            return Ok(SyncReport::DryRun(patch));
        }

        let mut deleted_ids: Vec<Id> = vec![];
        let mut new_ids: Vec<Id> = vec![];
        let mut update_ids: HashSet<Id> = HashSet::new();

        for hunk in &patch {
            match hunk {
                Hunk::RemoveRecord(id) => deleted_ids.push(id.clone()),
                Hunk::InsertRecord(id) => new_ids.push(id.clone()),
                Hunk::UpdateRecord(id) => {
                    update_ids.insert(id.clone());
                }
            }
        }

        if !deleted_ids.is_empty() {
            progress(SyncProgressEvent::ApplyDeletions(deleted_ids.len()))?;
            cache.delete_by_ids(folder, &deleted_ids).map_err(|err| {
                Error::CacheWriteError(err, WriteBatch::Deletions, folder.clone())
            })?;
        }

        let mut inserted = 0;
        if !new_ids.is_empty() {
            progress(SyncProgressEvent::ApplyInsertions(new_ids.len()))?;

            // a message can vanish between the two live reads, only
            // the requested ids are inserted
            let requested: HashSet<Id> = new_ids.iter().cloned().collect();
            let details: Vec<_> = live
                .fetch_detail(folder, &new_ids)
                .map_err(|err| Error::RemoteReadError(err, folder.clone()))?
                .into_iter()
                .filter(|detail| requested.contains(detail.record.id()))
                .collect();

            cache.insert_all(folder, &details).map_err(|err| {
                Error::CacheWriteError(err, WriteBatch::Insertions, folder.clone())
            })?;
            inserted = details.len();
        }

        let mut updated = 0;
        if !update_ids.is_empty() {
            progress(SyncProgressEvent::ApplyUpdates(update_ids.len()))?;

            let updates: Vec<SyncRecord> = record::filter_by_identities(&update_ids, &live_records)
                .into_iter()
                .cloned()
                .collect();

            cache
                .update_all(folder, &updates)
                .map_err(|err| Error::CacheWriteError(err, WriteBatch::Updates, folder.clone()))?;
            updated = updates.len();
        }

        cache
            .save_last_sync(folder, Utc::now())
            .map_err(|err| Error::SaveMarkerError(err, folder.clone()))?;

        let deleted = deleted_ids.len();
        info!("folder {folder} synchronized: {deleted} deleted, {inserted} inserted, {updated} updated");

        Ok(SyncReport::Synchronized {
            deleted,
            inserted,
            updated,
        })
    }

    /// Synchronizes a batch of folders, each one as its own isolated
    /// run on a rayon worker. A folder whose run fails gets the error
    /// in its result slot, the other folders are not affected.
    pub fn sync_all<L, C>(
        &self,
        folders: &[FolderKey],
        live: &L,
        cache: &C,
    ) -> Vec<(FolderKey, Result<SyncReport>)>
    where
        L: LiveStore + ?Sized,
        C: CacheStore + SyncStateStore + ?Sized,
    {
        folders
            .par_iter()
            .map(|folder| {
                let result = self.sync(folder, live, cache);
                if let Err(err) = &result {
                    warn!("error while synchronizing folder {folder}, skipping it: {err:?}");
                }
                (folder.clone(), result)
            })
            .collect()
    }
}

/// Builds the patch reconciling the cached snapshot with the live one.
///
/// Membership is decided by record id alone; a common id produces an
/// update only when the full record state (flags and custom flags)
/// diverges.
pub fn build_patch(cached: &Records, live: &Records) -> Patch {
    let mut patch: Patch = vec![];

    let mut ids = record::identities(cached);
    ids.extend(record::identities(live));

    // Given the matrice cached × live, checks every 2² = 4
    // possibilities:
    for id in &ids {
        let cached = cached.get(id);
        let live = live.get(id);

        match (cached, live) {
            // 00
            //
            // The id exists nowhere, which cannot happen since the ids
            // set has been built from both snapshots.
            (None, None) => (),

            // 01
            //
            // The id only exists in the live folder, which means a new
            // message appeared and needs to be inserted into the
            // cache.
            (None, Some(live)) => patch.push(Hunk::InsertRecord(live.id().to_owned())),

            // 10
            //
            // The id only exists in the cache, which means the message
            // disappeared from the live folder and its row needs to be
            // removed.
            (Some(cached), None) => patch.push(Hunk::RemoveRecord(cached.id().to_owned())),

            // 11
            //
            // The id exists on both sides, the cached row needs a
            // rewrite only when the live state diverges.
            (Some(cached), Some(live)) => {
                if cached != live {
                    patch.push(Hunk::UpdateRecord(live.id().to_owned()));
                }
            }
        }
    }

    patch
}

#[cfg(test)]
mod sync {
    use crate::{domain::record::from_listing, CustomFlags, Flag, Flags, Records, SyncRecord};

    use super::{build_patch, Hunk, Patch};

    fn record(id: &str, flags: Flags, custom_flags: &str) -> SyncRecord {
        SyncRecord::new(id, flags, CustomFlags::from(custom_flags)).unwrap()
    }

    #[test]
    fn build_patch_00() {
        let cached = Records::default();
        let live = Records::default();

        assert_eq!(vec![] as Patch, build_patch(&cached, &live));
    }

    #[test]
    fn build_patch_01() {
        let cached = Records::default();
        let live = from_listing([record("id", Flags::from(Flag::Seen), "")]);

        assert_eq!(
            vec![Hunk::InsertRecord("id".into())],
            build_patch(&cached, &live),
        );
    }

    #[test]
    fn build_patch_10() {
        let cached = from_listing([record("id", Flags::from(Flag::Seen), "")]);
        let live = Records::default();

        assert_eq!(
            vec![Hunk::RemoveRecord("id".into())],
            build_patch(&cached, &live),
        );
    }

    #[test]
    fn build_patch_11_same_state() {
        let cached = from_listing([record("id", Flags::from(Flag::Seen), "work")]);
        let live = from_listing([record("id", Flags::from(Flag::Seen), "work")]);

        assert_eq!(vec![] as Patch, build_patch(&cached, &live));
    }

    #[test]
    fn build_patch_11_different_flags() {
        let cached = from_listing([record("id", Flags::from(Flag::Seen), "")]);
        let live = from_listing([record("id", Flags::from_iter([Flag::Seen, Flag::Answered]), "")]);

        assert_eq!(
            vec![Hunk::UpdateRecord("id".into())],
            build_patch(&cached, &live),
        );
    }

    #[test]
    fn build_patch_11_different_custom_flags() {
        let cached = from_listing([record("id", Flags::from(Flag::Seen), "work")]);
        let live = from_listing([record("id", Flags::from(Flag::Seen), "work home")]);

        assert_eq!(
            vec![Hunk::UpdateRecord("id".into())],
            build_patch(&cached, &live),
        );
    }

    #[test]
    fn build_patch_mixed() {
        let cached = from_listing([
            record("m1", Flags::default(), ""),
            record("m2", Flags::from(Flag::Seen), ""),
        ]);
        let live = from_listing([
            record("m2", Flags::from(Flag::Seen), "\\flagged"),
            record("m3", Flags::default(), ""),
        ]);

        let patch = build_patch(&cached, &live);

        assert_eq!(3, patch.len());
        assert!(patch.contains(&Hunk::RemoveRecord("m1".into())));
        assert!(patch.contains(&Hunk::UpdateRecord("m2".into())));
        assert!(patch.contains(&Hunk::InsertRecord("m3".into())));
    }
}
