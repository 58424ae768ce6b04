// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed wallet store keyed by messaging account id.
//!
//! All access goes through one tokio-rusqlite connection, whose background
//! thread is the single writer for every account task in the process.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pawtap_core::{TapperError, WalletRecord, WalletStore};
use rusqlite::{OptionalExtension, TransactionBehavior};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations::run_migrations;

const SELECT_COLUMNS: &str = "SELECT account_id, address, private_key, public_key, mnemonic, \
                              session_name, username, created_at FROM wallets";

/// Convert a tokio-rusqlite error into TapperError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TapperError {
    TapperError::Storage {
        source: Box::new(e),
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<WalletRecord> {
    Ok(WalletRecord {
        account_id: row.get(0)?,
        address: row.get(1)?,
        private_key: row.get(2)?,
        public_key: row.get(3)?,
        mnemonic: row.get(4)?,
        session_name: row.get(5)?,
        username: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Shared wallet store. Cheap to clone.
#[derive(Clone)]
pub struct SqliteWalletStore {
    conn: Arc<Connection>,
}

impl SqliteWalletStore {
    /// Opens (creating if needed) the database at `path` and applies migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, TapperError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TapperError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| TapperError::Storage {
                source: Box::new(e),
            })?;
        let store = Self::prepare(conn).await?;
        info!(path = %path.display(), "wallet store opened");
        Ok(store)
    }

    /// Opens a private in-memory store. Nothing outlives the process.
    pub async fn open_in_memory() -> Result<Self, TapperError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| TapperError::Storage {
                source: Box::new(e),
            })?;
        let store = Self::prepare(conn).await?;
        debug!("in-memory wallet store opened");
        Ok(store)
    }

    async fn prepare(conn: Connection) -> Result<Self, TapperError> {
        conn.call(|conn| {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        Ok(Self {
            conn: Arc::new(conn),
        })
    }
}

#[async_trait]
impl WalletStore for SqliteWalletStore {
    async fn get(&self, account_id: i64) -> Result<Option<WalletRecord>, TapperError> {
        self.conn
            .call(move |conn| {
                conn.query_row(
                    &format!("{SELECT_COLUMNS} WHERE account_id = ?1"),
                    rusqlite::params![account_id],
                    row_to_record,
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn insert_if_absent(&self, record: WalletRecord) -> Result<WalletRecord, TapperError> {
        let account_id = record.account_id;
        let stored = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                tx.execute(
                    "INSERT OR IGNORE INTO wallets (account_id, address, private_key, \
                     public_key, mnemonic, session_name, username, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    rusqlite::params![
                        record.account_id,
                        record.address,
                        record.private_key,
                        record.public_key,
                        record.mnemonic,
                        record.session_name,
                        record.username,
                        record.created_at,
                    ],
                )?;
                let stored = tx.query_row(
                    &format!("{SELECT_COLUMNS} WHERE account_id = ?1"),
                    rusqlite::params![record.account_id],
                    row_to_record,
                )?;
                tx.commit()?;
                Ok(stored)
            })
            .await
            .map_err(map_tr_err)?;

        debug!(account_id, address = %stored.address, "wallet persisted");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account_id: i64, address: &str) -> WalletRecord {
        WalletRecord {
            account_id,
            address: address.to_string(),
            private_key: "aa".repeat(32),
            public_key: "bb".repeat(32),
            mnemonic: "word ".repeat(24).trim_end().to_string(),
            session_name: "main".to_string(),
            username: Some("ann".to_string()),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    async fn open_temp() -> (SqliteWalletStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteWalletStore::open(dir.path().join("nested/wallets.db"))
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn in_memory_store_works_without_a_file() {
        let store = SqliteWalletStore::open_in_memory().await.unwrap();
        assert!(store.get(7).await.unwrap().is_none());
        let kept = store.insert_if_absent(record(7, "0:mem")).await.unwrap();
        assert_eq!(kept.address, "0:mem");
        assert_eq!(store.get(7).await.unwrap().unwrap().address, "0:mem");
    }

    #[tokio::test]
    async fn missing_account_returns_none() {
        let (store, _dir) = open_temp().await;
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let (store, _dir) = open_temp().await;
        let stored = store.insert_if_absent(record(7, "0:first")).await.unwrap();
        assert_eq!(stored, record(7, "0:first"));
        assert_eq!(store.get(7).await.unwrap(), Some(record(7, "0:first")));
    }

    #[tokio::test]
    async fn second_insert_keeps_the_first_wallet() {
        let (store, _dir) = open_temp().await;
        store.insert_if_absent(record(7, "0:first")).await.unwrap();
        let survivor = store.insert_if_absent(record(7, "0:second")).await.unwrap();
        assert_eq!(survivor.address, "0:first");
    }

    #[tokio::test]
    async fn reopening_keeps_data_and_skips_applied_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.db");
        {
            let store = SqliteWalletStore::open(&path).await.unwrap();
            store.insert_if_absent(record(3, "0:kept")).await.unwrap();
        }
        let store = SqliteWalletStore::open(&path).await.unwrap();
        assert_eq!(store.get(3).await.unwrap().unwrap().address, "0:kept");
    }
}
