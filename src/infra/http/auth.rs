use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::application::auth::{AuthError, SESSION_COOKIE};
use crate::presentation::views::{
    LayoutContext, SignInContext, SignInTemplate, render_template_response,
};

use super::{HttpState, repo_error_to_http, resolve_actor, session_view};

const DEFAULT_NEXT: &str = "/add-post";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct SignInQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SignInForm {
    email: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    next: Option<String>,
}

/// Only same-site paths are honored as post-sign-in destinations.
fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => DEFAULT_NEXT.to_string(),
    }
}

pub(super) async fn sign_in_form(
    State(state): State<HttpState>,
    jar: CookieJar,
    Query(query): Query<SignInQuery>,
) -> Response {
    let actor = resolve_actor(&state, &jar).await;
    let content = SignInContext {
        next: sanitize_next(query.next.as_deref()),
        error: None,
        notice: None,
    };

    let view = LayoutContext::new(session_view(actor.as_ref()), content);
    render_template_response(SignInTemplate { view }, StatusCode::OK)
}

pub(super) async fn sign_in(
    State(state): State<HttpState>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let next = sanitize_next(form.next.as_deref());

    match state
        .auth
        .sign_in(&form.email, form.full_name.as_deref())
        .await
    {
        Ok((token, _actor)) => {
            let cookie = session_cookie(token);
            (jar.add(cookie), Redirect::to(&next)).into_response()
        }
        Err(AuthError::Validation(message)) => {
            let content = SignInContext {
                next,
                error: Some(message),
                notice: None,
            };
            let view = LayoutContext::new(session_view(None), content);
            render_template_response(SignInTemplate { view }, StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(AuthError::Repo(err)) => {
            repo_error_to_http("infra::http::auth::sign_in", err).into_response()
        }
    }
}

pub(super) async fn sign_out(State(state): State<HttpState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();
        if let Err(err) = state.auth.sign_out(&token).await {
            return repo_error_to_http("infra::http::auth::sign_out", err).into_response();
        }
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Redirect::to("/")).into_response()
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
