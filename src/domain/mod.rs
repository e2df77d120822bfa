pub mod flag;
pub use flag::{CustomFlags, Flag, Flags};

pub mod record;
pub use record::{Id, Records, SyncRecord, SyncRecordDetail};

pub mod folder;
pub use folder::FolderKey;
