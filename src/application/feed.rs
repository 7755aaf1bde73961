//! Read side of the blog: the paginated feed and post detail lookups.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::application::pagination::{PageItem, PageWindow, Pager};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::{body_preview, format_card_date, format_detail_date};
use crate::presentation::views::{
    FeedContext, FeedSummary, PageLinkView, PaginationView, PostCard, PostDetailContext,
};

pub const FEED_LOAD_ERROR: &str = "Failed to load posts. Please try again later.";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    /// Build the feed page for one pager. Backend failures resolve to the
    /// terminal error state rather than propagating: the page still
    /// renders with an error banner and no retry.
    pub async fn page_context(&self, pager: Pager) -> FeedContext {
        counter!("foglio_feed_fetch_total").increment(1);

        let page = match self.posts.list_page(pager).await {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    target = "foglio::feed",
                    error = %err,
                    page = pager.page(),
                    "feed query failed"
                );
                return FeedContext {
                    cards: Vec::new(),
                    error: Some(FEED_LOAD_ERROR.to_string()),
                    summary: None,
                    pagination: None,
                };
            }
        };

        let mut cards = Vec::with_capacity(page.records.len());
        for record in &page.records {
            match post_card(record) {
                Ok(card) => cards.push(card),
                Err(err) => {
                    warn!(
                        target = "foglio::feed",
                        error = %err,
                        post_id = %record.id,
                        "failed to project post card"
                    );
                    return FeedContext {
                        cards: Vec::new(),
                        error: Some(FEED_LOAD_ERROR.to_string()),
                        summary: None,
                        pagination: None,
                    };
                }
            }
        }

        let summary = (!cards.is_empty()).then(|| FeedSummary {
            start: pager.offset() + 1,
            end: pager.offset() + cards.len() as u64,
            total: page.total_count,
        });

        let pagination = PageWindow::build(pager, page.total_count).map(pagination_view);

        FeedContext {
            cards,
            error: None,
            summary,
            pagination,
        }
    }

    pub async fn post_detail(&self, id: Uuid) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(record) = self.posts.find_by_id(id).await? else {
            return Ok(None);
        };

        Ok(Some(PostDetailContext {
            title: record.title,
            body: record.body,
            author: record.author,
            published: format_detail_date(record.published_at)?,
        }))
    }
}

fn post_card(record: &PostRecord) -> Result<PostCard, DomainError> {
    Ok(PostCard {
        id: record.id.to_string(),
        title: record.title.clone(),
        preview: body_preview(&record.body),
        author: record.author.clone(),
        published: format_card_date(record.published_at)?,
    })
}

fn pagination_view(window: PageWindow) -> PaginationView {
    let items = window
        .items
        .iter()
        .map(|item| match item {
            PageItem::Number { page, is_current } => PageLinkView {
                page: *page,
                is_current: *is_current,
                is_gap: false,
            },
            PageItem::Ellipsis => PageLinkView {
                page: 0,
                is_current: false,
                is_gap: true,
            },
        })
        .collect();

    PaginationView {
        items,
        has_previous: window.has_previous(),
        has_next: window.has_next(),
        previous_page: window.previous_page(),
        next_page: window.next_page(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;
    use crate::application::repos::PostPage;

    struct StubPosts {
        records: Vec<PostRecord>,
        total: u64,
        fail: bool,
    }

    #[async_trait]
    impl PostsRepo for StubPosts {
        async fn list_page(&self, _pager: Pager) -> Result<PostPage, RepoError> {
            if self.fail {
                return Err(RepoError::Timeout);
            }
            Ok(PostPage {
                records: self.records.clone(),
                total_count: self.total,
            })
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
            if self.fail {
                return Err(RepoError::Timeout);
            }
            Ok(self.records.iter().find(|r| r.id == id).cloned())
        }
    }

    fn record(title: &str, body: &str) -> PostRecord {
        PostRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            body: body.to_string(),
            author: "Ada".to_string(),
            published_at: datetime!(2025-09-05 14:30 UTC),
        }
    }

    #[tokio::test]
    async fn backend_failure_resolves_to_error_state() {
        let service = FeedService::new(Arc::new(StubPosts {
            records: Vec::new(),
            total: 0,
            fail: true,
        }));

        let context = service.page_context(Pager::new(1)).await;
        assert_eq!(context.error.as_deref(), Some(FEED_LOAD_ERROR));
        assert!(context.cards.is_empty());
        assert!(context.summary.is_none());
        assert!(context.pagination.is_none());
    }

    #[tokio::test]
    async fn empty_feed_has_no_error_and_no_summary() {
        let service = FeedService::new(Arc::new(StubPosts {
            records: Vec::new(),
            total: 0,
            fail: false,
        }));

        let context = service.page_context(Pager::new(1)).await;
        assert!(context.error.is_none());
        assert!(context.cards.is_empty());
        assert!(context.summary.is_none());
    }

    #[tokio::test]
    async fn populated_feed_carries_summary_and_previews() {
        let long_body = "z".repeat(400);
        let service = FeedService::new(Arc::new(StubPosts {
            records: vec![record("First", &long_body), record("Second", "short body")],
            total: 12,
            fail: false,
        }));

        let context = service.page_context(Pager::new(2)).await;
        assert_eq!(context.cards.len(), 2);
        assert_eq!(
            context.summary,
            Some(FeedSummary {
                start: 6,
                end: 7,
                total: 12,
            })
        );
        assert!(context.cards[0].preview.ends_with("..."));
        assert_eq!(context.cards[0].preview.chars().count(), 153);
        assert_eq!(context.cards[1].preview, "short body");
        assert_eq!(context.cards[0].published, "Sep 5, 2025");

        let pagination = context.pagination.expect("three pages of twelve");
        assert!(pagination.has_previous);
        assert!(pagination.has_next);
    }

    #[tokio::test]
    async fn detail_of_unknown_id_is_none() {
        let service = FeedService::new(Arc::new(StubPosts {
            records: vec![record("Known", "a body long enough")],
            total: 1,
            fail: false,
        }));

        let found = service.post_detail(Uuid::new_v4()).await.expect("no error");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn detail_renders_verbose_date() {
        let known = record("Known", "a body long enough");
        let id = known.id;
        let service = FeedService::new(Arc::new(StubPosts {
            records: vec![known],
            total: 1,
            fail: false,
        }));

        let detail = service
            .post_detail(id)
            .await
            .expect("no error")
            .expect("found");
        assert_eq!(detail.published, "September 5, 2025, 02:30 PM");
        assert_eq!(detail.body, "a body long enough");
    }
}
