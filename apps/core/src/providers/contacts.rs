use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::model::ContactInfo;
use crate::providers::{ProviderError, ResultStream, SearchContext, SearchProvider};
use crate::result::SearchResult;

/// Device address book. Implementations may block; they are called on the blocking pool.
pub trait ContactsSource: Send + Sync {
    fn query(&self, keyword: &str, limit: usize) -> Result<Vec<ContactInfo>, ProviderError>;
}

pub struct SqliteContactsSource {
    db: Mutex<Connection>,
}

impl SqliteContactsSource {
    pub fn open(path: &Path) -> Result<Self, ProviderError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::init(Connection::open(path)?)?)
    }

    pub fn open_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS contact (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn upsert(&self, contact: &ContactInfo) -> Result<(), ProviderError> {
        let db = self
            .db
            .lock()
            .map_err(|_| ProviderError::Task("contacts store poisoned".into()))?;
        db.execute(
            "INSERT INTO contact (id, display_name, phone, email) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET display_name=excluded.display_name,
                phone=excluded.phone, email=excluded.email",
            params![contact.id, contact.display_name, contact.phone, contact.email],
        )?;
        Ok(())
    }
}

impl ContactsSource for SqliteContactsSource {
    fn query(&self, keyword: &str, limit: usize) -> Result<Vec<ContactInfo>, ProviderError> {
        let db = self
            .db
            .lock()
            .map_err(|_| ProviderError::Task("contacts store poisoned".into()))?;
        let pattern = format!("%{}%", escape_like(keyword.trim()));
        let mut stmt = db.prepare(
            "SELECT id, display_name, phone, email FROM contact
             WHERE display_name LIKE ?1 ESCAPE '\\'
                OR phone LIKE ?1 ESCAPE '\\'
                OR email LIKE ?1 ESCAPE '\\'
             ORDER BY display_name COLLATE NOCASE LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![pattern, limit as i64], |row| {
            Ok(ContactInfo {
                id: row.get(0)?,
                display_name: row.get(1)?,
                phone: row.get(2)?,
                email: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct ContactsSearchProvider {
    source: Arc<dyn ContactsSource>,
}

impl ContactsSearchProvider {
    pub fn new(source: Arc<dyn ContactsSource>) -> Self {
        Self { source }
    }
}

impl SearchProvider for ContactsSearchProvider {
    fn id(&self) -> &'static str {
        "contacts"
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream {
        if query.trim().is_empty() || !ctx.config.search_result_contacts {
            return ResultStream::ready(Vec::new());
        }
        if !ctx.permissions.contacts {
            return ResultStream::spawn(self.id(), ctx, async {
                Err(ProviderError::PermissionDenied("contacts"))
            });
        }

        let source = Arc::clone(&self.source);
        let keyword = query.to_string();
        let limit = ctx.config.max_contact_results as usize;
        ResultStream::spawn_blocking(self.id(), ctx, move |_| {
            let contacts = source.query(&keyword, limit)?;
            Ok(contacts.into_iter().map(SearchResult::Contact).collect())
        })
    }
}
