use std::{fmt, result};
use thiserror::Error;

use crate::{store, FolderKey};

/// Identifies which of the three write batches failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteBatch {
    Deletions,
    Insertions,
    Updates,
}

impl fmt::Display for WriteBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deletions => write!(f, "deletions"),
            Self::Insertions => write!(f, "insertions"),
            Self::Updates => write!(f, "updates"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot list live records of folder {1}")]
    RemoteReadError(#[source] store::live::Error, FolderKey),
    #[error("cannot load cached records of folder {1}")]
    CacheReadError(#[source] store::Error, FolderKey),
    #[error("cannot apply {1} batch to cached folder {2}")]
    CacheWriteError(#[source] store::Error, WriteBatch, FolderKey),
    #[error("cannot save sync marker of folder {1}")]
    SaveMarkerError(#[source] store::Error, FolderKey),
    #[error("unexpected failure while synchronizing folder {1}")]
    UnexpectedError(#[source] store::BoxError, FolderKey),
}

pub type Result<T> = result::Result<T, Error>;
