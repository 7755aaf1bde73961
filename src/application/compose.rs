//! Write side of the blog: submitting a new post.

use std::sync::Arc;

use metrics::counter;
use time::OffsetDateTime;
use tracing::warn;

use crate::application::repos::{CreatePostParams, PostsWriteRepo};
use crate::domain::entities::PostRecord;
use crate::domain::identity::Actor;
use crate::domain::posts::{DraftErrors, PostDraft};

pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to create post. Please try again.";

/// Result of one submission attempt. `Unauthenticated` and `Invalid`
/// are decided before the store is touched.
#[derive(Debug)]
pub enum SubmitOutcome {
    Unauthenticated,
    Invalid(DraftErrors),
    Created(PostRecord),
    Failed(String),
}

pub struct ComposeService {
    posts_write: Arc<dyn PostsWriteRepo>,
}

impl ComposeService {
    pub fn new(posts_write: Arc<dyn PostsWriteRepo>) -> Self {
        Self { posts_write }
    }

    pub async fn submit(&self, actor: Option<&Actor>, title: &str, body: &str) -> SubmitOutcome {
        let Some(actor) = actor else {
            return SubmitOutcome::Unauthenticated;
        };

        let draft = match PostDraft::new(title, body) {
            Ok(draft) => draft,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        counter!("foglio_post_create_total").increment(1);

        let params = CreatePostParams {
            title: draft.title().to_string(),
            body: draft.body().to_string(),
            author: actor.author_name(),
            published_at: OffsetDateTime::now_utc(),
        };

        match self.posts_write.create_post(params).await {
            Ok(record) => SubmitOutcome::Created(record),
            Err(err) => {
                warn!(
                    target = "foglio::compose",
                    error = %err,
                    "post insert failed"
                );
                SubmitOutcome::Failed(SUBMIT_FAILED_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::application::repos::RepoError;

    #[derive(Default)]
    struct RecordingWrites {
        created: Mutex<Vec<CreatePostParams>>,
        fail: bool,
    }

    #[async_trait]
    impl PostsWriteRepo for RecordingWrites {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            self.created
                .lock()
                .expect("lock poisoned")
                .push(params.clone());
            if self.fail {
                return Err(RepoError::Timeout);
            }
            Ok(PostRecord {
                id: Uuid::new_v4(),
                title: params.title,
                body: params.body,
                author: params.author,
                published_at: params.published_at,
            })
        }
    }

    fn actor(email: Option<&str>) -> Actor {
        Actor {
            identity_id: Uuid::new_v4(),
            email: email.map(str::to_string),
            full_name: None,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn unauthenticated_submission_never_writes() {
        let writes = Arc::new(RecordingWrites::default());
        let service = ComposeService::new(writes.clone());

        let outcome = service
            .submit(None, "A valid title", "a body long enough")
            .await;

        assert!(matches!(outcome, SubmitOutcome::Unauthenticated));
        assert!(writes.created.lock().expect("lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_never_writes() {
        let writes = Arc::new(RecordingWrites::default());
        let service = ComposeService::new(writes.clone());

        let outcome = service
            .submit(Some(&actor(Some("a@b.com"))), "ab", "short")
            .await;

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert!(errors.title.is_some());
                assert!(errors.body.is_some());
            }
            other => panic!("expected invalid outcome, got {other:?}"),
        }
        assert!(writes.created.lock().expect("lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn email_only_actor_is_credited_by_email() {
        let writes = Arc::new(RecordingWrites::default());
        let service = ComposeService::new(writes.clone());

        let outcome = service
            .submit(
                Some(&actor(Some("a@b.com"))),
                "A valid title",
                "a body long enough",
            )
            .await;

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        let created = writes.created.lock().expect("lock poisoned");
        assert_eq!(created[0].author, "a@b.com");
    }

    #[tokio::test]
    async fn nameless_actor_is_credited_as_anonymous() {
        let writes = Arc::new(RecordingWrites::default());
        let service = ComposeService::new(writes.clone());

        service
            .submit(Some(&actor(None)), "A valid title", "a body long enough")
            .await;

        let created = writes.created.lock().expect("lock poisoned");
        assert_eq!(created[0].author, "Anonymous");
    }

    #[tokio::test]
    async fn publish_time_is_assigned_at_submission() {
        let writes = Arc::new(RecordingWrites::default());
        let service = ComposeService::new(writes.clone());

        let before = OffsetDateTime::now_utc();
        service
            .submit(
                Some(&actor(Some("a@b.com"))),
                "A valid title",
                "a body long enough",
            )
            .await;
        let after = OffsetDateTime::now_utc();

        let created = writes.created.lock().expect("lock poisoned");
        assert!(created[0].published_at >= before && created[0].published_at <= after);
    }

    #[tokio::test]
    async fn store_failure_keeps_a_form_level_message() {
        let writes = Arc::new(RecordingWrites {
            fail: true,
            ..Default::default()
        });
        let service = ComposeService::new(writes.clone());

        let outcome = service
            .submit(
                Some(&actor(Some("a@b.com"))),
                "A valid title",
                "a body long enough",
            )
            .await;

        match outcome {
            SubmitOutcome::Failed(message) => {
                assert_eq!(message, "Failed to create post. Please try again.");
            }
            other => panic!("expected failed outcome, got {other:?}"),
        }
    }
}
