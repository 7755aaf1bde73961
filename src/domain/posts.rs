//! Post content rules: validation bounds, body previews, date formats.

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use super::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MIN_CHARS: usize = 10;
pub const BODY_MAX_CHARS: usize = 10_000;

/// Number of body characters shown on a feed card before truncation.
pub const PREVIEW_CHARS: usize = 150;

pub const CARD_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
pub const DETAIL_DATE_FORMAT: &[FormatItem<'static>] = format_description!(
    "[month repr:long] [day padding:none], [year], [hour repr:12 padding:zero]:[minute] [period]"
);

/// A validated post draft. Construction trims both fields and enforces
/// the length bounds, so a value of this type is always writable.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    title: String,
    body: String,
}

/// Field-scoped validation failures for a submitted draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftErrors {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

impl PostDraft {
    pub fn new(title: &str, body: &str) -> Result<Self, DraftErrors> {
        let title = title.trim();
        let body = body.trim();
        let mut errors = DraftErrors::default();

        let title_chars = title.chars().count();
        if title_chars < TITLE_MIN_CHARS {
            errors.title = Some(format!(
                "Title must be at least {TITLE_MIN_CHARS} characters"
            ));
        } else if title_chars > TITLE_MAX_CHARS {
            errors.title = Some(format!(
                "Title must be at most {TITLE_MAX_CHARS} characters"
            ));
        }

        let body_chars = body.chars().count();
        if body_chars < BODY_MIN_CHARS {
            errors.body = Some(format!("Body must be at least {BODY_MIN_CHARS} characters"));
        } else if body_chars > BODY_MAX_CHARS {
            errors.body = Some(format!("Body must be at most {BODY_MAX_CHARS} characters"));
        }

        if errors.is_empty() {
            Ok(Self {
                title: title.to_string(),
                body: body.to_string(),
            })
        } else {
            Err(errors)
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// First [`PREVIEW_CHARS`] characters of the body, with a trailing
/// ellipsis only when the body is actually longer.
pub fn body_preview(body: &str) -> String {
    let mut chars = body.chars();
    let preview: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}

pub fn format_card_date(at: OffsetDateTime) -> Result<String, DomainError> {
    at.format(CARD_DATE_FORMAT)
        .map_err(|err| DomainError::invariant(format!("failed to format card date: {err}")))
}

pub fn format_detail_date(at: OffsetDateTime) -> Result<String, DomainError> {
    at.format(DETAIL_DATE_FORMAT)
        .map_err(|err| DomainError::invariant(format!("failed to format detail date: {err}")))
}
