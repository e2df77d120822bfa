use chrono::{DateTime, Utc};

use crate::FolderKey;

use super::Result;

/// Bookkeeping of the per-folder refresh marker: the wall-clock time
/// of the last completed synchronization run.
pub trait SyncStateStore: Send + Sync {
    /// Returns the last sync marker of the folder, if any run ever
    /// completed for it.
    fn last_sync(&self, folder: &FolderKey) -> Result<Option<DateTime<Utc>>>;

    /// Persists the given timestamp as the new last sync marker of the
    /// folder.
    fn save_last_sync(&self, folder: &FolderKey, at: DateTime<Utc>) -> Result<()>;
}
