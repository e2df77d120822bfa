use std::result;
use thiserror::Error;

use crate::{FolderKey, Id, SyncRecord, SyncRecordDetail};

use super::BoxError;

/// Wraps whatever failure the remote access layer reports: transport,
/// authentication or protocol errors all surface through here.
#[derive(Debug, Error)]
#[error("cannot access remote mail store")]
pub struct Error(#[source] pub BoxError);

pub type Result<T> = result::Result<T, Error>;

/// Gateway to the authoritative remote mail store. The synchronizer
/// only ever reads from it, the remote state is never written to.
pub trait LiveStore: Send + Sync {
    /// Lists every currently visible message of the folder, restricted
    /// to the minimal reconciliation fields (id, system flags, custom
    /// flags). Ordering is undefined.
    fn list_minimal(&self, folder: &FolderKey) -> Result<Vec<SyncRecord>>;

    /// Fetches the full record detail for the given ids. Used only for
    /// newly discovered messages, whose cache rows need fields beyond
    /// the minimal set.
    fn fetch_detail(&self, folder: &FolderKey, ids: &[Id]) -> Result<Vec<SyncRecordDetail>>;
}
