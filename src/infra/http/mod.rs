mod auth;
mod compose;
mod middleware;
mod public;

pub use public::{HttpState, build_router};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;
use tracing::warn;

use crate::application::auth::SESSION_COOKIE;
use crate::application::error::{ErrorReport, HttpError};
use crate::application::repos::RepoError;
use crate::domain::identity::Actor;
use crate::presentation::views::SessionView;
use axum_extra::extract::cookie::CookieJar;

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::InvalidInput { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

/// Resolve the request's session cookie to an actor. Lookup failures are
/// logged and treated as a signed-out request.
async fn resolve_actor(state: &HttpState, jar: &CookieJar) -> Option<Actor> {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    match state.auth.current_actor(token.as_deref()).await {
        Ok(actor) => actor,
        Err(err) => {
            warn!(
                target = "foglio::http::session",
                error = %err,
                "session lookup failed"
            );
            None
        }
    }
}

fn session_view(actor: Option<&Actor>) -> SessionView {
    SessionView {
        signed_in: actor.is_some(),
        display_name: actor.map(Actor::author_name),
    }
}
