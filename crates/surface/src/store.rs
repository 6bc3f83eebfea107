//! User CRUD stores: mock and persisted variants.
//!
//! Both variants implement the same [`UserStore`] contract. The persisted
//! variant delegates to the shared SQLite database and bumps a
//! revalidation signal after every mutation so dependent views can
//! refresh. Failures from the backing store are caught, logged, and
//! re-raised as a generic "operation failed" error — never swallowed,
//! never surfaced raw.

use async_trait::async_trait;
use parking_lot::Mutex;
use sandbox_common::{Database, Error, NewUser, Result, UserPatch, UserRecord};
use tokio::sync::watch;
use tracing::error;

/// CRUD contract for the users screen.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<UserRecord>>;
    async fn create(&self, new: NewUser) -> Result<UserRecord>;
    async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord>;
    async fn delete(&self, id: i64) -> Result<()>;

    /// Observe the store revision. The value changes after every
    /// successful mutation.
    fn watch_revision(&self) -> watch::Receiver<u64>;
}

// ============================================================================
// Mock variant
// ============================================================================

/// In-memory store. Ids follow a monotonic timestamp scheme assigned
/// locally, never reused.
pub struct MemoryUserStore {
    inner: Mutex<MemoryInner>,
    revision_tx: watch::Sender<u64>,
    revision_rx: watch::Receiver<u64>,
}

struct MemoryInner {
    users: Vec<UserRecord>,
    last_id: i64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        let (revision_tx, revision_rx) = watch::channel(0);
        Self {
            inner: Mutex::new(MemoryInner {
                users: Vec::new(),
                last_id: 0,
            }),
            revision_tx,
            revision_rx,
        }
    }

    fn bump_revision(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        let inner = self.inner.lock();
        let mut users = inner.users.clone();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(users)
    }

    async fn create(&self, new: NewUser) -> Result<UserRecord> {
        let mut inner = self.inner.lock();
        let now = chrono::Utc::now();

        // Timestamp-derived, forced monotonic so rapid creates in the
        // same millisecond still get distinct ids.
        let id = now.timestamp_millis().max(inner.last_id + 1);
        inner.last_id = id;

        let record = UserRecord {
            id,
            email: new.email,
            name: new.name,
            role: new.role,
            created_at: now.timestamp(),
            updated_at: now.timestamp(),
        };
        inner.users.push(record.clone());
        drop(inner);

        self.bump_revision();
        Ok(record)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord> {
        let mut inner = self.inner.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(Error::NotFound {
                kind: "user".to_string(),
                id: id.to_string(),
            })?;

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = chrono::Utc::now().timestamp();
        let updated = user.clone();
        drop(inner);

        self.bump_revision();
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(Error::NotFound {
                kind: "user".to_string(),
                id: id.to_string(),
            });
        }
        drop(inner);

        self.bump_revision();
        Ok(())
    }

    fn watch_revision(&self) -> watch::Receiver<u64> {
        self.revision_rx.clone()
    }
}

// ============================================================================
// Persisted variant
// ============================================================================

/// SQLite-backed store. The database assigns ids and timestamps.
pub struct SqliteUserStore {
    db: Database,
    revision_tx: watch::Sender<u64>,
    revision_rx: watch::Receiver<u64>,
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        let (revision_tx, revision_rx) = watch::channel(0);
        Self {
            db,
            revision_tx,
            revision_rx,
        }
    }

    /// Log the underlying failure, hand the caller the generic error.
    fn store_failed(op: &str, err: Error) -> Error {
        error!("user store {} failed: {}", op, err);
        Error::StoreFailed
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        self.db
            .list_users()
            .map_err(|e| Self::store_failed("list", e))
    }

    async fn create(&self, new: NewUser) -> Result<UserRecord> {
        let record = self
            .db
            .insert_user(&new)
            .map_err(|e| Self::store_failed("create", e))?;
        self.revision_tx.send_modify(|rev| *rev += 1);
        Ok(record)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<UserRecord> {
        let record = self
            .db
            .update_user(id, &patch)
            .map_err(|e| Self::store_failed("update", e))?;
        self.revision_tx.send_modify(|rev| *rev += 1);
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let deleted = self
            .db
            .delete_user(id)
            .map_err(|e| Self::store_failed("delete", e))?;
        if !deleted {
            return Err(Self::store_failed(
                "delete",
                Error::NotFound {
                    kind: "user".to_string(),
                    id: id.to_string(),
                },
            ));
        }
        self.revision_tx.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn watch_revision(&self) -> watch::Receiver<u64> {
        self.revision_rx.clone()
    }
}
