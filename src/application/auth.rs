//! Session auth: opaque cookie tokens resolved through the auth repo.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AuthRepo, CreateIdentityParams, RepoError};
use crate::domain::identity::Actor;

pub const SESSION_COOKIE: &str = "foglio_session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct AuthService {
    repo: Arc<dyn AuthRepo>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepo>, session_ttl: Duration) -> Self {
        Self { repo, session_ttl }
    }

    /// Resolve the request's session cookie to an actor. Missing cookies,
    /// unknown tokens, and expired sessions all resolve to `None`.
    pub async fn current_actor(&self, token: Option<&str>) -> Result<Option<Actor>, RepoError> {
        let Some(token) = token.filter(|value| !value.is_empty()) else {
            return Ok(None);
        };

        let identity = self
            .repo
            .find_identity_by_token(token, OffsetDateTime::now_utc())
            .await?;

        Ok(identity.as_ref().map(Actor::from_identity))
    }

    /// Provision an identity for the supplied email and open a session,
    /// returning the opaque token to set as a cookie.
    pub async fn sign_in(
        &self,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<(String, Actor), AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }

        let full_name = full_name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let identity = self
            .repo
            .upsert_identity(CreateIdentityParams {
                email: Some(email.to_string()),
                full_name,
                display_name: None,
            })
            .await?;

        let token = issue_token();
        let now = OffsetDateTime::now_utc();
        let expires_at = now + self.session_ttl;
        self.repo
            .create_session(&token, identity.id, now, expires_at)
            .await?;

        Ok((token, Actor::from_identity(&identity)))
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), RepoError> {
        self.repo.delete_session(token).await
    }
}

/// 64 hex characters of v4 randomness. Opaque to clients; only ever
/// compared against the sessions table.
fn issue_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;
    use crate::domain::entities::{IdentityRecord, SessionRecord};

    #[derive(Default)]
    struct MemoryAuth {
        identities: Mutex<Vec<IdentityRecord>>,
        sessions: Mutex<HashMap<String, SessionRecord>>,
    }

    #[async_trait]
    impl AuthRepo for MemoryAuth {
        async fn find_identity_by_token(
            &self,
            token: &str,
            now: OffsetDateTime,
        ) -> Result<Option<IdentityRecord>, RepoError> {
            let sessions = self.sessions.lock().expect("lock poisoned");
            let Some(session) = sessions.get(token).filter(|s| s.expires_at > now) else {
                return Ok(None);
            };
            let identities = self.identities.lock().expect("lock poisoned");
            Ok(identities
                .iter()
                .find(|i| i.id == session.identity_id)
                .cloned())
        }

        async fn upsert_identity(
            &self,
            params: CreateIdentityParams,
        ) -> Result<IdentityRecord, RepoError> {
            let mut identities = self.identities.lock().expect("lock poisoned");
            if let Some(existing) = identities.iter().find(|i| i.email == params.email) {
                return Ok(existing.clone());
            }
            let record = IdentityRecord {
                id: Uuid::new_v4(),
                email: params.email,
                full_name: params.full_name,
                display_name: params.display_name,
                created_at: OffsetDateTime::now_utc(),
            };
            identities.push(record.clone());
            Ok(record)
        }

        async fn create_session(
            &self,
            token: &str,
            identity_id: Uuid,
            now: OffsetDateTime,
            expires_at: OffsetDateTime,
        ) -> Result<SessionRecord, RepoError> {
            let record = SessionRecord {
                token: token.to_string(),
                identity_id,
                created_at: now,
                expires_at,
            };
            self.sessions
                .lock()
                .expect("lock poisoned")
                .insert(token.to_string(), record.clone());
            Ok(record)
        }

        async fn delete_session(&self, token: &str) -> Result<(), RepoError> {
            self.sessions.lock().expect("lock poisoned").remove(token);
            Ok(())
        }
    }

    fn service(repo: Arc<MemoryAuth>) -> AuthService {
        AuthService::new(repo, Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn sign_in_opens_a_resolvable_session() {
        let repo = Arc::new(MemoryAuth::default());
        let auth = service(repo);

        let (token, actor) = auth
            .sign_in("a@b.com", Some("Ada Lovelace"))
            .await
            .expect("sign in");
        assert_eq!(actor.author_name(), "Ada Lovelace");

        let resolved = auth
            .current_actor(Some(&token))
            .await
            .expect("no repo error")
            .expect("actor");
        assert_eq!(resolved.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn blank_email_is_rejected() {
        let auth = service(Arc::new(MemoryAuth::default()));
        let err = auth.sign_in("   ", None).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_or_unknown_tokens_resolve_to_none() {
        let auth = service(Arc::new(MemoryAuth::default()));
        assert!(auth.current_actor(None).await.expect("ok").is_none());
        assert!(auth.current_actor(Some("")).await.expect("ok").is_none());
        assert!(
            auth.current_actor(Some("nonsense"))
                .await
                .expect("ok")
                .is_none()
        );
    }

    #[tokio::test]
    async fn expired_sessions_are_ignored() {
        let repo = Arc::new(MemoryAuth::default());
        let auth = service(repo.clone());

        let identity = repo
            .upsert_identity(CreateIdentityParams {
                email: Some("a@b.com".to_string()),
                full_name: None,
                display_name: None,
            })
            .await
            .expect("identity");
        repo.create_session(
            "stale-token",
            identity.id,
            datetime!(2020-01-01 00:00 UTC),
            datetime!(2020-01-02 00:00 UTC),
        )
        .await
        .expect("session");

        let resolved = auth
            .current_actor(Some("stale-token"))
            .await
            .expect("no repo error");
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn signed_out_tokens_stop_resolving() {
        let repo = Arc::new(MemoryAuth::default());
        let auth = service(repo);

        let (token, _) = auth.sign_in("a@b.com", None).await.expect("sign in");
        auth.sign_out(&token).await.expect("sign out");
        assert!(
            auth.current_actor(Some(&token))
                .await
                .expect("ok")
                .is_none()
        );
    }

    #[test]
    fn issued_tokens_are_long_and_unique() {
        let first = issue_token();
        let second = issue_token();
        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }
}
