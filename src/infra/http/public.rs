use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{
        auth::AuthService, compose::ComposeService, feed::FeedService, pagination::Pager,
        sequence::FetchSequence,
    },
    infra::db::PostgresRepositories,
    presentation::views::{
        FeedPartial, IndexTemplate, LayoutContext, PostTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    auth as auth_routes, compose as compose_routes, db_health_response,
    middleware::{log_responses, set_request_context},
    resolve_actor, session_view,
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub compose: Arc<ComposeService>,
    pub auth: Arc<AuthService>,
    pub sequence: Arc<FetchSequence>,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/posts/{id}", get(post_detail))
        .route("/ui/posts", get(feed_partial))
        .route(
            "/add-post",
            get(compose_routes::compose_form).post(compose_routes::submit_post),
        )
        .route(
            "/auth/sign-in",
            get(auth_routes::sign_in_form).post(auth_routes::sign_in),
        )
        .route("/auth/sign-out", post(auth_routes::sign_out))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PageQuery {
    page: Option<String>,
}

async fn index(
    State(state): State<HttpState>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> Response {
    let actor = resolve_actor(&state, &jar).await;
    let pager = Pager::from_query(query.page.as_deref());
    let content = state.feed.page_context(pager).await;

    let view = LayoutContext::new(session_view(actor.as_ref()), content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

/// Progressive-enhancement fragment of the feed. The fetch token is
/// compared after the query resolves; a response that lost the race to a
/// newer fetch is discarded instead of rendered.
async fn feed_partial(State(state): State<HttpState>, Query(query): Query<PageQuery>) -> Response {
    let token = state.sequence.begin();
    let pager = Pager::from_query(query.page.as_deref());
    let content = state.feed.page_context(pager).await;

    if !state.sequence.is_current(token) {
        counter!("foglio_feed_stale_discard_total").increment(1);
        return StatusCode::NO_CONTENT.into_response();
    }

    render_template_response(FeedPartial { content }, StatusCode::OK)
}

async fn post_detail(
    State(state): State<HttpState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let actor = resolve_actor(&state, &jar).await;

    let Ok(id) = Uuid::parse_str(&id) else {
        return render_not_found_response();
    };

    match state.feed.post_detail(id).await {
        Ok(Some(content)) => {
            let view = LayoutContext::new(session_view(actor.as_ref()), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(),
        Err(err) => {
            // Detail lookups degrade to not-found rather than surfacing
            // a raw failure; the report keeps the diagnostic for logs.
            let mut response = render_not_found_response();
            crate::application::error::ErrorReport::from_error(
                "infra::http::public::post_detail",
                StatusCode::NOT_FOUND,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

async fn fallback() -> Response {
    render_not_found_response()
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}
