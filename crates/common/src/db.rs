//! SQLite database backing the persisted user store

use crate::{Error, NewUser, Result, Role, UserPatch, UserRecord};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Database wrapper for sandbox persistence
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        info!("Opened database at {:?}", path.as_ref());
        Ok(db)
    }

    /// Open in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            "#,
        )?;

        debug!("Database schema initialized");
        Ok(())
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, i64, i64)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn parse_user(raw: (i64, String, String, String, i64, i64)) -> Result<UserRecord> {
        let (id, email, name, role, created_at, updated_at) = raw;
        Ok(UserRecord {
            id,
            email,
            name,
            role: role.parse::<Role>()?,
            created_at,
            updated_at,
        })
    }

    /// Insert a user. The database assigns the id and both timestamps.
    pub fn insert_user(&self, new: &NewUser) -> Result<UserRecord> {
        let conn = self.conn.lock();
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (email, name, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.email, new.name, new.role.as_str(), now, now],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted user {} ({})", id, new.email);

        Ok(UserRecord {
            id,
            email: new.email.clone(),
            name: new.name.clone(),
            role: new.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock();

        let raw = conn
            .query_row(
                "SELECT id, email, name, role, created_at, updated_at
                 FROM users WHERE id = ?1",
                params![id],
                Self::row_to_user,
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(Self::parse_user(raw)?)),
            None => Ok(None),
        }
    }

    /// List all users, newest first
    pub fn list_users(&self) -> Result<Vec<UserRecord>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, email, name, role, created_at, updated_at
             FROM users ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], Self::row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(Self::parse_user(row?)?);
        }

        Ok(users)
    }

    /// Apply a partial update and return the updated record
    pub fn update_user(&self, id: i64, patch: &UserPatch) -> Result<UserRecord> {
        {
            let conn = self.conn.lock();
            let now = chrono::Utc::now().timestamp();

            if let Some(email) = &patch.email {
                conn.execute(
                    "UPDATE users SET email = ?1, updated_at = ?2 WHERE id = ?3",
                    params![email, now, id],
                )?;
            }
            if let Some(name) = &patch.name {
                conn.execute(
                    "UPDATE users SET name = ?1, updated_at = ?2 WHERE id = ?3",
                    params![name, now, id],
                )?;
            }
            if let Some(role) = patch.role {
                conn.execute(
                    "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
                    params![role.as_str(), now, id],
                )?;
            }
        }

        self.get_user(id)?.ok_or_else(|| Error::NotFound {
            kind: "user".to_string(),
            id: id.to_string(),
        })
    }

    /// Delete a user. Returns whether a row was removed.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows > 0 {
            debug!("Deleted user {}", id);
        }

        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn crud_round_trip() {
        let db = Database::open_memory().unwrap();

        let created = db.insert_user(&new_user("ada@qa-sandbox.com")).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.created_at, created.updated_at);

        let listed = db.list_users().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "ada@qa-sandbox.com");

        let updated = db
            .update_user(
                created.id,
                &UserPatch {
                    name: Some("Ada Lovelace".to_string()),
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.email, "ada@qa-sandbox.com");

        assert!(db.delete_user(created.id).unwrap());
        assert!(!db.delete_user(created.id).unwrap());
        assert!(db.get_user(created.id).unwrap().is_none());
    }

    #[test]
    fn ids_are_never_reused() {
        let db = Database::open_memory().unwrap();

        let first = db.insert_user(&new_user("a@qa-sandbox.com")).unwrap();
        db.delete_user(first.id).unwrap();
        let second = db.insert_user(&new_user("b@qa-sandbox.com")).unwrap();

        // AUTOINCREMENT forbids rowid reuse after a delete.
        assert!(second.id > first.id);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = Database::open_memory().unwrap();
        db.insert_user(&new_user("dup@qa-sandbox.com")).unwrap();
        assert!(db.insert_user(&new_user("dup@qa-sandbox.com")).is_err());
    }

    #[test]
    fn update_missing_user_is_not_found() {
        let db = Database::open_memory().unwrap();
        let err = db
            .update_user(
                42,
                &UserPatch {
                    name: Some("Nobody".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
