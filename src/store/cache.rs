use crate::{FolderKey, Id, SyncRecord, SyncRecordDetail};

use super::Result;

/// Gateway to the durable header cache of one account. The
/// synchronizer is the only writer of cache rows.
///
/// Each write operation applies its whole batch as one atomic unit:
/// either every row of the batch is committed or none is.
pub trait CacheStore: Send + Sync {
    /// Loads every cached record of the folder, restricted to the
    /// minimal reconciliation fields.
    fn load_all(&self, folder: &FolderKey) -> Result<Vec<SyncRecord>>;

    /// Removes the rows of the given ids in one batch.
    fn delete_by_ids(&self, folder: &FolderKey, ids: &[Id]) -> Result<()>;

    /// Inserts new rows from the given details in one batch.
    fn insert_all(&self, folder: &FolderKey, details: &[SyncRecordDetail]) -> Result<()>;

    /// Rewrites the flag state of existing rows in one batch.
    fn update_all(&self, folder: &FolderKey, records: &[SyncRecord]) -> Result<()>;
}
