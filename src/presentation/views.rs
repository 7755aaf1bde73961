use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let view = ErrorPageView::not_found();
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Session-aware navigation shown in the layout header.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub signed_in: bool,
    pub display_name: Option<String>,
}

#[derive(Clone)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub author: String,
    pub published: String,
}

/// The "Showing X to Y of Z posts" line above the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

#[derive(Clone)]
pub struct PageLinkView {
    pub page: u32,
    pub is_current: bool,
    pub is_gap: bool,
}

#[derive(Clone)]
pub struct PaginationView {
    pub items: Vec<PageLinkView>,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page: u32,
    pub next_page: u32,
}

/// Feed page content. Exactly one of the three states renders: an error
/// banner, the empty message, or the populated card list.
pub struct FeedContext {
    pub cards: Vec<PostCard>,
    pub error: Option<String>,
    pub summary: Option<FeedSummary>,
    pub pagination: Option<PaginationView>,
}

pub struct PostDetailContext {
    pub title: String,
    pub body: String,
    pub author: String,
    pub published: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A notice banner, optionally followed by a delayed client-side
/// navigation (meta refresh) to `redirect_to`.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub redirect_to: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            redirect_to: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            redirect_to: None,
        }
    }

    pub fn with_redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect_to = Some(to.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

#[derive(Default)]
pub struct ComposeContext {
    pub title_value: String,
    pub body_value: String,
    pub title_error: Option<String>,
    pub body_error: Option<String>,
    pub notice: Option<Notice>,
}

pub struct SignInContext {
    pub next: String,
    pub error: Option<String>,
    pub notice: Option<Notice>,
}

pub struct ErrorPageView {
    pub heading: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            heading: "Page not found".to_string(),
            message: "The page you are looking for does not exist.".to_string(),
        }
    }
}

pub struct LayoutContext<T> {
    pub session: SessionView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(session: SessionView, content: T) -> Self {
        Self { session, content }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<FeedContext>,
}

#[derive(Template)]
#[template(path = "partials/feed.html")]
pub struct FeedPartial {
    pub content: FeedContext,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

#[derive(Template)]
#[template(path = "compose.html")]
pub struct ComposeTemplate {
    pub view: LayoutContext<ComposeContext>,
}

#[derive(Template)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {
    pub view: LayoutContext<SignInContext>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}
