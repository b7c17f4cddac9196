use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

/// Revocation registry for session tokens, keyed by the token's `jti`.
///
/// Consulted only by the authentication service; signature validity stays
/// the token verifier's concern. `revoke` carries the token's remaining
/// lifetime so a shared backend (e.g. Redis `SET ... EX`) can expire the
/// entry at the token's own expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Idempotent: revoking an already-revoked token is a no-op.
    async fn revoke(&self, jti: &str, expires_in_seconds: i64) -> Result<(), anyhow::Error>;
    async fn is_revoked(&self, jti: &str) -> Result<bool, anyhow::Error>;
}

/// Process-local registry. Entries are dropped lazily once the token they
/// belong to has expired anyway, keeping the set bounded by the number of
/// live tokens.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    revoked: Mutex<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, jti: &str, expires_in_seconds: i64) -> Result<(), anyhow::Error> {
        let expires_at = Utc::now().timestamp() + expires_in_seconds.max(0);
        let mut revoked = self.revoked.lock().await;
        revoked.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, anyhow::Error> {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.lock().await;
        revoked.retain(|_, expires_at| *expires_at >= now);
        Ok(revoked.contains_key(jti))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revoke_then_lookup() {
        let store = InMemoryRevocationStore::new();
        assert!(!store.is_revoked("abc").await.unwrap());

        store.revoke("abc", 600).await.unwrap();
        assert!(store.is_revoked("abc").await.unwrap());
        assert!(!store.is_revoked("other").await.unwrap());
    }

    #[tokio::test]
    async fn revocation_is_idempotent() {
        let store = InMemoryRevocationStore::new();
        store.revoke("abc", 600).await.unwrap();
        store.revoke("abc", 600).await.unwrap();
        assert!(store.is_revoked("abc").await.unwrap());
    }

    #[tokio::test]
    async fn entries_evict_after_token_expiry() {
        let store = InMemoryRevocationStore::new();
        store.revoke("stale", -5).await.unwrap();
        // Entry expiry is clamped to "now"; the next lookup sweeps it.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(!store.is_revoked("stale").await.unwrap());
    }
}
