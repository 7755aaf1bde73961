use async_trait::async_trait;
use sqlx::{query, query_as};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AuthRepo, CreateIdentityParams, RepoError};
use crate::domain::entities::{IdentityRecord, SessionRecord};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl AuthRepo for PostgresRepositories {
    async fn find_identity_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<Option<IdentityRecord>, RepoError> {
        query_as::<_, IdentityRecord>(
            "SELECT i.id, i.email, i.full_name, i.display_name, i.created_at \
             FROM sessions s \
             INNER JOIN identities i ON i.id = s.identity_id \
             WHERE s.token = $1 AND s.expires_at > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn upsert_identity(
        &self,
        params: CreateIdentityParams,
    ) -> Result<IdentityRecord, RepoError> {
        query_as::<_, IdentityRecord>(
            "INSERT INTO identities (id, email, full_name, display_name, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (email) DO UPDATE \
             SET full_name = COALESCE(EXCLUDED.full_name, identities.full_name), \
                 display_name = COALESCE(EXCLUDED.display_name, identities.display_name) \
             RETURNING id, email, full_name, display_name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&params.email)
        .bind(&params.full_name)
        .bind(&params.display_name)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn create_session(
        &self,
        token: &str,
        identity_id: Uuid,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<SessionRecord, RepoError> {
        query_as::<_, SessionRecord>(
            "INSERT INTO sessions (token, identity_id, created_at, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING token, identity_id, created_at, expires_at",
        )
        .bind(token)
        .bind(identity_id)
        .bind(now)
        .bind(expires_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn delete_session(&self, token: &str) -> Result<(), RepoError> {
        query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
