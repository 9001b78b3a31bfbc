/// In-process session store for `tower-sessions`
///
/// Session records live in process memory and are lost on restart. A record
/// carries only the signed-in user's ID under [`USER_ID_KEY`]; the user row is
/// re-read on every request.
///
/// # Lifetime
///
/// Login stamps an absolute expiry on the session. Expired records are
/// invisible to `load` immediately and physically removed by
/// [`ExpiredDeletion::delete_expired`], which [`MemorySessionStore::spawn_pruner`]
/// runs on a fixed interval.
///
/// # Example
///
/// ```
/// use loanlead_shared::auth::session::MemorySessionStore;
/// use std::sync::Arc;
/// use tower_sessions::Session;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemorySessionStore::new();
/// let session = Session::new(None, Arc::new(store.clone()), None);
/// session.insert("user_id", 1).await?;
/// session.save().await?;
///
/// assert_eq!(store.len().await, 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_sessions::{
    cookie::Key,
    session::{Id, Record},
    session_store::{self, ExpiredDeletion, SessionStore},
};

/// Session data key holding the signed-in user's ID
pub const USER_ID_KEY: &str = "user_id";

/// Derives the cookie signing key from the configured session secret
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Shared in-memory session records
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<RwLock<HashMap<Id, Record>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired record; returns how many were removed
    pub async fn prune_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.expiry_date > now);
        before - records.len()
    }

    /// Number of stored records, including expired ones not yet pruned
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Runs [`prune_expired`](Self::prune_expired) every `interval` until
    /// `shutdown` is cancelled
    pub fn spawn_pruner(
        &self,
        interval: std::time::Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; nothing can be expired yet.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("Session pruner stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = store.prune_expired().await;
                        if removed > 0 {
                            tracing::info!(removed, "Pruned expired sessions");
                        }
                    }
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.write().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        tracing::debug!("Session created");
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .records
            .read()
            .await
            .get(session_id)
            .filter(|record| record.expiry_date > now)
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.write().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        self.prune_expired().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date,
        }
    }

    #[tokio::test]
    async fn test_create_load_delete() {
        let store = MemorySessionStore::new();
        let mut live = record(OffsetDateTime::now_utc() + Duration::hours(24));
        store.create(&mut live).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_some());

        store.delete(&live.id).await.unwrap();
        assert!(store.load(&live.id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = MemorySessionStore::new();
        let mut stale = record(OffsetDateTime::now_utc() - Duration::hours(1));
        store.create(&mut stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_records() {
        let store = MemorySessionStore::new();
        let mut live = record(OffsetDateTime::now_utc() + Duration::hours(24));
        let mut stale = record(OffsetDateTime::now_utc() - Duration::hours(24));
        store.create(&mut live).await.unwrap();
        store.create(&mut stale).await.unwrap();

        store.delete_expired().await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[test]
    fn test_signing_key_depends_on_secret() {
        let a = signing_key("test-session-secret-at-least-32-bytes");
        let b = signing_key("test-session-secret-at-least-32-bytes");
        let c = signing_key("another-session-secret-at-least-32-b");

        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pruner_runs_on_interval_and_stops() {
        let store = MemorySessionStore::new();
        let mut stale = record(OffsetDateTime::now_utc() - Duration::hours(1));
        store.create(&mut stale).await.unwrap();

        let shutdown = CancellationToken::new();
        let handle = store.spawn_pruner(std::time::Duration::from_secs(60), shutdown.clone());

        tokio::time::sleep(std::time::Duration::from_secs(61)).await;
        assert!(store.is_empty().await);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
