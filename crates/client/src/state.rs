//! Transient client state: the status channel, form drafts, and the feed.
//!
//! Everything here lives only in process memory. Drafts mutate on every
//! keystroke and are cleared on the success path of their flow; the feed is
//! replaced wholesale on each load.

use pulse_shared::{Post, RegisterRequest};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// The single most recent action outcome shown to the operator.
///
/// A new outcome of either kind replaces the previous one; nothing queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Registration form input. Cleared only after a successful registration;
/// on failure it stays put for the operator to correct and resubmit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsDraft {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl CredentialsDraft {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.username.clear();
        self.password.clear();
    }

    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty()
            && !self.username.trim().is_empty()
            && !self.password.is_empty()
    }
}

/// Post form input. The author id is kept as entered after a publish so the
/// same author can post repeatedly; only `content` is disposable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub author_id: String,
    pub content: String,
}

impl PostDraft {
    /// Build the creation payload. The author id is coerced to an integer
    /// when it parses as one and forwarded as the raw string otherwise,
    /// leaving rejection to the server.
    pub fn payload(&self) -> Value {
        let author = self.author_id.trim();
        let author_value = match author.parse::<i64>() {
            Ok(n) => json!(n),
            Err(_) => json!(author),
        };
        json!({ "author_id": author_value, "content": self.content.trim() })
    }

    pub fn is_complete(&self) -> bool {
        !self.author_id.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Identifies one feed load from issue to settlement.
///
/// Loads are applied last-write-wins: a settled load older than the most
/// recently issued one is discarded without touching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

/// The locally held feed page.
///
/// Ordering is whatever the server returned; the client never re-sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub posts: Vec<Post>,
    pub is_loading: bool,
    issued: u64,
}

impl FeedState {
    /// Mark a load as in flight and hand out its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.is_loading = true;
        LoadTicket { seq: self.issued }
    }

    /// Whether no newer load has been issued since this ticket.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.seq == self.issued
    }

    /// Settle a load. Returns `false` for a superseded ticket, in which case
    /// nothing changes and the flag stays owned by the newer load. `posts`
    /// of `None` means the load failed: the previous posts are kept.
    pub fn settle(&mut self, ticket: LoadTicket, posts: Option<Vec<Post>>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.is_loading = false;
        if let Some(posts) = posts {
            self.posts = posts;
        }
        true
    }
}
