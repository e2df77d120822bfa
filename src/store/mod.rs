//! Store module.
//!
//! This module exposes the gateway traits the synchronizer works
//! against: the read-only live store on one side, the durable cache
//! store and its sync-state bookkeeping on the other, plus the sqlite
//! implementation of the latter two.

use std::{error, result};
use thiserror::Error;

pub mod cache;
pub mod live;
pub mod sqlite;
pub mod state;

pub use cache::CacheStore;
pub use live::LiveStore;
pub use sqlite::SqliteCacheStore;
pub use state::SyncStateStore;

pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),
    #[error("cannot access cache store")]
    OtherError(#[source] BoxError),
}

pub type Result<T> = result::Result<T, Error>;
