use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use crate::application::pagination::Pager;
use crate::application::repos::{
    CreatePostParams, PostPage, PostsRepo, PostsWriteRepo, RepoError,
};
use crate::domain::entities::PostRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_page(&self, pager: Pager) -> Result<PostPage, RepoError> {
        let limit = i64::try_from(pager.limit())
            .map_err(|_| RepoError::from_persistence("page size exceeds supported range"))?;
        let offset = i64::try_from(pager.offset())
            .map_err(|_| RepoError::from_persistence("page offset exceeds supported range"))?;

        let records = query_as::<_, PostRecord>(
            "SELECT id, title, body, author, published_at \
             FROM posts \
             ORDER BY published_at DESC, id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostPage {
            records,
            total_count: Self::convert_count(total)?,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        query_as::<_, PostRecord>(
            "SELECT id, title, body, author, published_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        query_as::<_, PostRecord>(
            "INSERT INTO posts (id, title, body, author, published_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, body, author, published_at",
        )
        .bind(Uuid::new_v4())
        .bind(&params.title)
        .bind(&params.body)
        .bind(&params.author)
        .bind(params.published_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
