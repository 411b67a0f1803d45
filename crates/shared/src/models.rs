//! Data models exchanged with the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published post as the feed endpoint returns it.
///
/// Read-only on the client: the local feed is replaced wholesale on every
/// load and individual posts are never patched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    /// Not every deployment echoes the creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for the account registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// The part of a registration response the client relies on.
///
/// `username` is optional so the deployment variant that does not echo it
/// back still decodes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// The part of a post-creation response the client relies on.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedPost {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_without_created_at() {
        let post: Post =
            serde_json::from_str(r#"{"id":1,"author_id":2,"content":"hi"}"#).unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.author_id, 2);
        assert!(post.created_at.is_none());
    }

    #[test]
    fn created_user_tolerates_missing_username() {
        let user: CreatedUser = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.username.is_none());

        let user: CreatedUser =
            serde_json::from_str(r#"{"id":7,"username":"alice","is_active":true}"#).unwrap();
        assert_eq!(user.username.as_deref(), Some("alice"));
    }
}
