//! Actor identity and author-name resolution.

use crate::domain::entities::IdentityRecord;

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// The signed-in principal attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub identity_id: uuid::Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
}

impl Actor {
    pub fn from_identity(identity: &IdentityRecord) -> Self {
        Self {
            identity_id: identity.id,
            email: identity.email.clone(),
            full_name: identity.full_name.clone(),
            display_name: identity.display_name.clone(),
        }
    }

    /// Byline shown on posts: full name, then display name, then email,
    /// then the anonymous fallback. Blank values are skipped.
    pub fn author_name(&self) -> String {
        [&self.full_name, &self.display_name, &self.email]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn actor(
        full_name: Option<&str>,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> Actor {
        Actor {
            identity_id: Uuid::new_v4(),
            email: email.map(str::to_string),
            full_name: full_name.map(str::to_string),
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn full_name_wins_over_everything() {
        let a = actor(Some("Ada Lovelace"), Some("ada"), Some("a@b.com"));
        assert_eq!(a.author_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_wins_over_email() {
        let a = actor(None, Some("ada"), Some("a@b.com"));
        assert_eq!(a.author_name(), "ada");
    }

    #[test]
    fn email_only_actor_is_credited_by_email() {
        let a = actor(None, None, Some("a@b.com"));
        assert_eq!(a.author_name(), "a@b.com");
    }

    #[test]
    fn nameless_actor_falls_back_to_anonymous() {
        let a = actor(None, None, None);
        assert_eq!(a.author_name(), "Anonymous");
    }

    #[test]
    fn blank_values_are_skipped() {
        let a = actor(Some("   "), Some(""), Some("a@b.com"));
        assert_eq!(a.author_name(), "a@b.com");
    }
}
