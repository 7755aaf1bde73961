use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::application::compose::SubmitOutcome;
use crate::presentation::views::{
    ComposeContext, ComposeTemplate, LayoutContext, Notice, render_template_response,
};

use super::{HttpState, resolve_actor, session_view};

pub(super) const LOGIN_REQUIRED_MESSAGE: &str = "Please login to add Post";
pub(super) const POST_ADDED_MESSAGE: &str = "Blog added successfully";

#[derive(Debug, Deserialize)]
pub(super) struct ComposeForm {
    title: String,
    body: String,
}

pub(super) async fn compose_form(State(state): State<HttpState>, jar: CookieJar) -> Response {
    let actor = resolve_actor(&state, &jar).await;

    let content = if actor.is_some() {
        ComposeContext::default()
    } else {
        ComposeContext {
            notice: Some(Notice::error(LOGIN_REQUIRED_MESSAGE).with_redirect("/auth/sign-in")),
            ..Default::default()
        }
    };

    let view = LayoutContext::new(session_view(actor.as_ref()), content);
    render_template_response(ComposeTemplate { view }, StatusCode::OK)
}

pub(super) async fn submit_post(
    State(state): State<HttpState>,
    jar: CookieJar,
    Form(form): Form<ComposeForm>,
) -> Response {
    let actor = resolve_actor(&state, &jar).await;
    let outcome = state
        .compose
        .submit(actor.as_ref(), &form.title, &form.body)
        .await;

    let session = session_view(actor.as_ref());
    let (content, status) = match outcome {
        SubmitOutcome::Unauthenticated => (
            ComposeContext {
                title_value: form.title,
                body_value: form.body,
                notice: Some(
                    Notice::error(LOGIN_REQUIRED_MESSAGE).with_redirect("/auth/sign-in"),
                ),
                ..Default::default()
            },
            StatusCode::UNAUTHORIZED,
        ),
        SubmitOutcome::Invalid(errors) => (
            ComposeContext {
                title_value: form.title,
                body_value: form.body,
                title_error: errors.title,
                body_error: errors.body,
                notice: None,
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        SubmitOutcome::Created(_) => (
            ComposeContext {
                notice: Some(Notice::success(POST_ADDED_MESSAGE).with_redirect("/")),
                ..Default::default()
            },
            StatusCode::OK,
        ),
        SubmitOutcome::Failed(message) => (
            ComposeContext {
                title_value: form.title,
                body_value: form.body,
                notice: Some(Notice::error(message)),
                ..Default::default()
            },
            StatusCode::OK,
        ),
    };

    let view = LayoutContext::new(session, content);
    render_template_response(ComposeTemplate { view }, status)
}
