pub mod config;
pub use config::SyncConfig;

pub mod domain;
pub use domain::*;

pub mod store;
pub use store::{CacheStore, LiveStore, SqliteCacheStore, SyncStateStore};

pub mod sync;
pub use sync::{
    build_patch, Hunk, Patch, RefreshDecision, SyncBuilder, SyncProgressEvent, SyncReport,
    WriteBatch,
};
