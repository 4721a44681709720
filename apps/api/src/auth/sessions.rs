use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, warn};

use crate::auth::Session;
use crate::errors::AppError;

const TOKEN_LEN: usize = 48;

/// Key/value storage for serialized sessions.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn put(&self, key: &str, payload: String, ttl_secs: u64) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct RedisSessions {
    client: redis::Client,
}

#[async_trait]
impl SessionBackend for RedisSessions {
    async fn put(&self, key: &str, payload: String, ttl_secs: u64) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(redis::cmd("GET").arg(key).query_async(&mut conn).await?)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// Opaque bearer tokens mapped to serialized sessions.
/// Keys are `session:{token}` and expire after the configured TTL.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    ttl_secs: u64,
}

impl SessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self::with_backend(Arc::new(RedisSessions { client }), ttl_secs)
    }

    pub fn with_backend(backend: Arc<dyn SessionBackend>, ttl_secs: u64) -> Self {
        Self { backend, ttl_secs }
    }

    /// Stores the session and returns its new token.
    pub async fn create(&self, session: &Session) -> Result<String, AppError> {
        let token = generate_token();
        let payload = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow!("failed to encode session: {e}")))?;

        self.backend
            .put(&session_key(&token), payload, self.ttl_secs)
            .await?;

        debug!("Created session for user {}", session.user_id);
        Ok(token)
    }

    /// Returns `None` for unknown, expired or malformed tokens.
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, AppError> {
        if !is_well_formed(token) {
            return Ok(None);
        }

        let payload = self.backend.get(&session_key(token)).await?;
        Ok(payload.and_then(|raw| match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding unreadable session payload: {e}");
                None
            }
        }))
    }

    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        if !is_well_formed(token) {
            return Ok(());
        }
        self.backend.delete(&session_key(token)).await
    }
}

/// In-memory backend without expiry. Test-only.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySessions {
    entries: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
#[async_trait]
impl SessionBackend for MemorySessions {
    async fn put(&self, key: &str, payload: String, _ttl_secs: u64) -> Result<(), AppError> {
        self.entries.lock().unwrap().insert(key.to_string(), payload);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

fn session_key(token: &str) -> String {
    format!("session:{token}")
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_well_formed_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert!(is_well_formed(&a));
        assert!(is_well_formed(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_tokens_with_separators() {
        let mut token = generate_token();
        token.replace_range(0..1, ":");
        assert!(!is_well_formed(&token));
        assert!(!is_well_formed("short"));
    }

    #[test]
    fn test_session_key_prefix() {
        assert_eq!(session_key("abc"), "session:abc");
    }

    #[tokio::test]
    async fn test_create_resolve_revoke() {
        let store = SessionStore::with_backend(Arc::new(MemorySessions::default()), 60);
        let session = Session {
            user_id: uuid::Uuid::new_v4(),
            email: "hr@acme.com".to_string(),
            user_type: crate::models::profile::UserType::Organization,
        };

        let token = store.create(&session).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), Some(session));

        store.revoke(&token).await.unwrap();
        assert_eq!(store.resolve(&token).await.unwrap(), None);
        assert_eq!(store.resolve("not-a-token").await.unwrap(), None);
    }
}
