use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::result;
use thiserror::Error;

use crate::{CustomFlags, Flags};

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build sync record with an empty id")]
    EmptyIdError,
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the stable identifier of one remote message.
pub type Id = String;

fn date<S: Serializer>(date: &Option<DateTime<Utc>>, s: S) -> result::Result<S::Ok, S::Error> {
    match date {
        Some(date) => s.serialize_some(&date.to_rfc3339()),
        None => s.serialize_none(),
    }
}

/// Represents the reconcilable state of one remote message: its
/// identifier, its system flags and its custom flag set.
///
/// Records are built fresh from a store listing at the start of a run
/// and never mutated afterwards. Two records are the same message when
/// their ids match (see [`SyncRecord::same_id`]), and the same message
/// in the same state when they compare equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SyncRecord {
    id: Id,
    flags: Flags,
    custom_flags: CustomFlags,
}

impl SyncRecord {
    pub fn new<I>(id: I, flags: Flags, custom_flags: CustomFlags) -> Result<Self>
    where
        I: ToString,
    {
        let id = id.to_string();
        if id.is_empty() {
            return Err(Error::EmptyIdError);
        }

        Ok(Self {
            id,
            flags,
            custom_flags,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn custom_flags(&self) -> &CustomFlags {
        &self.custom_flags
    }

    /// Checks whether both records refer to the same message,
    /// regardless of their flag state.
    pub fn same_id(&self, other: &SyncRecord) -> bool {
        self.id == other.id
    }

    /// Builds the record fingerprint from the id, the flags mask and
    /// the custom flag set. Two records in the same state share the
    /// same fingerprint across runs.
    pub fn fingerprint(&self) -> String {
        let hash = md5::compute(format!(
            "{}\u{1f}{}\u{1f}{}",
            self.id,
            self.flags.bits(),
            self.custom_flags,
        ));
        format!("{:x}", hash)
    }
}

/// Represents the full detail of a newly discovered record as fetched
/// from the live store. Insertion carries fields beyond the minimal
/// reconciliation set.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SyncRecordDetail {
    pub record: SyncRecord,
    #[serde(serialize_with = "date")]
    pub received_at: Option<DateTime<Utc>>,
    pub size: Option<u32>,
}

impl SyncRecordDetail {
    pub fn new(record: SyncRecord) -> Self {
        Self {
            record,
            received_at: None,
            size: None,
        }
    }
}
