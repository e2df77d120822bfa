use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::{CustomFlags, Flags, FolderKey, Id, SyncRecord, SyncRecordDetail};

use super::{CacheStore, Result, SyncStateStore};

const CREATE_RECORDS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS records (
        context      INTEGER NOT NULL,
        user         INTEGER NOT NULL,
        account      INTEGER NOT NULL,
        folder       TEXT    NOT NULL,
        id           TEXT    NOT NULL,
        flags        INTEGER NOT NULL,
        custom_flags TEXT    NOT NULL,
        fingerprint  TEXT    NOT NULL,
        received_at  DATETIME,
        size         INTEGER,
        UNIQUE(context, user, account, folder, id)
    )
";

const CREATE_SYNC_STATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS sync_state (
        context   INTEGER  NOT NULL,
        user      INTEGER  NOT NULL,
        account   INTEGER  NOT NULL,
        folder    TEXT     NOT NULL,
        last_sync DATETIME NOT NULL,
        UNIQUE(context, user, account, folder)
    )
";

const SELECT_RECORDS: &str = "
    SELECT id, flags, custom_flags
    FROM records
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
";

const INSERT_RECORD: &str = "
    INSERT INTO records
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_RECORD: &str = "
    UPDATE records
    SET flags = ?, custom_flags = ?, fingerprint = ?
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
    AND id = ?
";

const DELETE_RECORD: &str = "
    DELETE FROM records
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
    AND id = ?
";

const DELETE_RECORDS: &str = "
    DELETE FROM records
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
";

const SELECT_LAST_SYNC: &str = "
    SELECT last_sync
    FROM sync_state
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
";

const UPSERT_LAST_SYNC: &str = "
    INSERT INTO sync_state
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(context, user, account, folder)
    DO UPDATE SET last_sync = excluded.last_sync
";

const DELETE_SYNC_STATE: &str = "
    DELETE FROM sync_state
    WHERE context = ?
    AND user = ?
    AND account = ?
    AND folder = ?
";

/// Sqlite-backed header cache. One durable row per record keyed by
/// folder and id, one sync-state row per folder.
pub struct SqliteCacheStore {
    db_path: PathBuf,
}

impl SqliteCacheStore {
    const DB_FILE: &'static str = ".headers.sqlite";

    pub fn new<P>(cache_dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            db_path: cache_dir.as_ref().join(Self::DB_FILE),
        }
    }

    fn db(&self) -> Result<Connection> {
        let db = Connection::open(&self.db_path)?;
        db.execute(CREATE_RECORDS_TABLE, [])?;
        db.execute(CREATE_SYNC_STATE_TABLE, [])?;
        Ok(db)
    }

    /// Removes every row and the sync-state of the folder, in one
    /// transaction. Used when a folder is dropped or recreated.
    pub fn purge(&self, folder: &FolderKey) -> Result<()> {
        let mut db = self.db()?;
        let tx = db.transaction()?;
        tx.execute(
            DELETE_RECORDS,
            params![
                folder.context_id,
                folder.user_id,
                folder.account_id,
                folder.folder,
            ],
        )?;
        tx.execute(
            DELETE_SYNC_STATE,
            params![
                folder.context_id,
                folder.user_id,
                folder.account_id,
                folder.folder,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl CacheStore for SqliteCacheStore {
    fn load_all(&self, folder: &FolderKey) -> Result<Vec<SyncRecord>> {
        let db = self.db()?;
        let mut stmt = db.prepare(SELECT_RECORDS)?;
        let rows: Vec<(Id, u32, String)> = stmt
            .query_map(
                params![
                    folder.context_id,
                    folder.user_id,
                    folder.account_id,
                    folder.folder,
                ],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?
            .collect::<rusqlite::Result<_>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, flags, custom_flags)| {
                match SyncRecord::new(
                    id,
                    Flags::from(flags),
                    CustomFlags::from(custom_flags.as_str()),
                ) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!("invalid cached record, skipping it: {err}");
                        None
                    }
                }
            })
            .collect())
    }

    fn delete_by_ids(&self, folder: &FolderKey, ids: &[Id]) -> Result<()> {
        let mut db = self.db()?;
        let tx = db.transaction()?;
        {
            let mut stmt = tx.prepare(DELETE_RECORD)?;
            for id in ids {
                stmt.execute(params![
                    folder.context_id,
                    folder.user_id,
                    folder.account_id,
                    folder.folder,
                    id,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_all(&self, folder: &FolderKey, details: &[SyncRecordDetail]) -> Result<()> {
        let mut db = self.db()?;
        let tx = db.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_RECORD)?;
            for detail in details {
                stmt.execute(params![
                    folder.context_id,
                    folder.user_id,
                    folder.account_id,
                    folder.folder,
                    detail.record.id(),
                    detail.record.flags().bits(),
                    detail.record.custom_flags().to_string(),
                    detail.record.fingerprint(),
                    detail.received_at.map(|date| date.to_rfc3339()),
                    detail.size,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn update_all(&self, folder: &FolderKey, records: &[SyncRecord]) -> Result<()> {
        let mut db = self.db()?;
        let tx = db.transaction()?;
        {
            let mut stmt = tx.prepare(UPDATE_RECORD)?;
            for record in records {
                stmt.execute(params![
                    record.flags().bits(),
                    record.custom_flags().to_string(),
                    record.fingerprint(),
                    folder.context_id,
                    folder.user_id,
                    folder.account_id,
                    folder.folder,
                    record.id(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl SyncStateStore for SqliteCacheStore {
    fn last_sync(&self, folder: &FolderKey) -> Result<Option<DateTime<Utc>>> {
        let db = self.db()?;
        let last_sync: Option<String> = db
            .query_row(
                SELECT_LAST_SYNC,
                params![
                    folder.context_id,
                    folder.user_id,
                    folder.account_id,
                    folder.folder,
                ],
                |row| row.get(0),
            )
            .optional()?;

        Ok(last_sync.and_then(|date| match DateTime::parse_from_rfc3339(&date) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(err) => {
                warn!("invalid sync marker {date}, ignoring it: {err}");
                None
            }
        }))
    }

    fn save_last_sync(&self, folder: &FolderKey, at: DateTime<Utc>) -> Result<()> {
        self.db()?.execute(
            UPSERT_LAST_SYNC,
            params![
                folder.context_id,
                folder.user_id,
                folder.account_id,
                folder.folder,
                at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
