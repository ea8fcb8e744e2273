use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::config::Config;
use crate::model::RecentKeyword;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("history store lock poisoned")]
    Poisoned,
}

pub trait HistoryStore: Send + Sync {
    fn recent(&self, limit: usize) -> Result<Vec<RecentKeyword>, StoreError>;
    fn record(&self, keyword: &str, at_epoch_secs: i64) -> Result<(), StoreError>;
}

pub struct SqliteHistoryStore {
    db: Mutex<Connection>,
}

impl SqliteHistoryStore {
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    pub fn open_file(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_from_config(cfg: &Config) -> Result<Self, StoreError> {
        Self::open_file(&cfg.history_db_path)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS recent_keyword (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                keyword TEXT NOT NULL UNIQUE,
                last_used INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn recent(&self, limit: usize) -> Result<Vec<RecentKeyword>, StoreError> {
        let db = self.db.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = db.prepare(
            "SELECT keyword, last_used FROM recent_keyword
             ORDER BY last_used DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RecentKeyword {
                keyword: row.get(0)?,
                last_used_epoch_secs: row.get(1)?,
            })
        })?;
        let keywords = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(keywords)
    }

    fn record(&self, keyword: &str, at_epoch_secs: i64) -> Result<(), StoreError> {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let db = self.db.lock().map_err(|_| StoreError::Poisoned)?;
        db.execute(
            "INSERT INTO recent_keyword (keyword, last_used) VALUES (?1, ?2)
             ON CONFLICT(keyword) DO UPDATE SET last_used=excluded.last_used",
            params![trimmed, at_epoch_secs],
        )?;
        Ok(())
    }
}
