//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::Pager;
use crate::domain::entities::{IdentityRecord, PostRecord, SessionRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// One windowed slice of the feed plus the exact unfiltered total.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub records: Vec<PostRecord>,
    pub total_count: u64,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub body: String,
    pub author: String,
    pub published_at: OffsetDateTime,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// List one page ordered by `published_at` descending, newest first,
    /// together with the exact total number of posts.
    async fn list_page(&self, pager: Pager) -> Result<PostPage, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateIdentityParams {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait AuthRepo: Send + Sync {
    /// Resolve a session token to its identity, skipping expired sessions.
    async fn find_identity_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<Option<IdentityRecord>, RepoError>;

    async fn upsert_identity(
        &self,
        params: CreateIdentityParams,
    ) -> Result<IdentityRecord, RepoError>;

    async fn create_session(
        &self,
        token: &str,
        identity_id: Uuid,
        now: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<SessionRecord, RepoError>;

    async fn delete_session(&self, token: &str) -> Result<(), RepoError>;
}
