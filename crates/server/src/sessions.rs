//! In-memory bearer tokens.
//!
//! Each login gets a random token mapped to its [`Session`]. Tokens expire
//! after the configured idle time; every authenticated request pushes the
//! expiry forward.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use engine::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

struct Entry {
    session: Session,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `session` and returns its new token.
    pub async fn insert(&self, session: Session) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.clone(),
            Entry {
                session,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Looks up a live token and refreshes its expiry.
    pub async fn touch(&self, token: &str) -> Option<Session> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        match entries.get_mut(token) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + self.ttl;
                Some(entry.session.clone())
            }
            Some(_) => {
                entries.remove(token);
                None
            }
            None => None,
        }
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.entries.write().await.remove(token).is_some()
    }

    /// Drops every token of a user (after deletion or deactivation).
    pub async fn remove_user(&self, user_id: Uuid) {
        self.entries
            .write()
            .await
            .retain(|_, entry| entry.session.user_id != user_id);
    }
}

#[cfg(test)]
mod tests {
    use engine::Role;

    use super::*;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            username: "clerk".to_string(),
            name: "Clerk".to_string(),
            role: Role::Write,
        }
    }

    #[tokio::test]
    async fn tokens_resolve_until_removed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.insert(session()).await;

        assert_eq!(store.touch(&token).await.map(|s| s.username), Some("clerk".to_string()));
        assert!(store.remove(&token).await);
        assert!(store.touch(&token).await.is_none());
        assert!(!store.remove(&token).await);
    }

    #[tokio::test]
    async fn expired_tokens_are_rejected() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.insert(session()).await;
        assert!(store.touch(&token).await.is_none());
    }

    #[tokio::test]
    async fn removing_a_user_drops_all_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        let s = session();
        let user_id = s.user_id;
        let a = store.insert(s.clone()).await;
        let b = store.insert(s).await;

        store.remove_user(user_id).await;
        assert!(store.touch(&a).await.is_none());
        assert!(store.touch(&b).await.is_none());
    }
}
