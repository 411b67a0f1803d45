//! The operator session and the flows that keep it in sync with the API.
//!
//! Each flow runs its steps strictly in sequence: a publish only triggers a
//! feed reload after the creation response has been observed. Flows are
//! split into an async half that talks to the gateway and a synchronous
//! `apply_*` half that folds the outcome into state, so a host UI can run
//! the network part on a task and apply the result on its own loop. The
//! composed async methods do both in one call.

use pulse_shared::{ApiError, CreatedPost, CreatedUser, Post};

use crate::api_client::ApiClient;
use crate::state::{CredentialsDraft, FeedState, LoadTicket, PostDraft, Status};

pub const DEFAULT_BASE_ADDRESS: &str = "http://127.0.0.1:8000";

/// Where the client points. Updated only by an explicit connect action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub base_address: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
        }
    }
}

impl SessionConfig {
    /// Trim surrounding whitespace and at most one trailing slash.
    pub fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();
        trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
    }
}

/// One operator session: the configured endpoint, the form drafts, the
/// locally held feed page, and the latest action outcome.
#[derive(Debug, Clone)]
pub struct Session {
    gateway: ApiClient,
    pub config: SessionConfig,
    pub credentials: CredentialsDraft,
    pub post_draft: PostDraft,
    pub feed: FeedState,
    pub status: Option<Status>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            gateway: ApiClient::new(config.base_address.clone()),
            config,
            credentials: CredentialsDraft::default(),
            post_draft: PostDraft::default(),
            feed: FeedState::default(),
            status: None,
        }
    }

    pub fn gateway(&self) -> &ApiClient {
        &self.gateway
    }

    /// Commit a new base address and rebuild the gateway against it.
    ///
    /// The address takes effect before any liveness probe resolves; a failed
    /// connect leaves it committed for the operator to correct and retry.
    pub fn set_base_address(&mut self, raw: &str) {
        self.config.base_address = SessionConfig::normalize(raw);
        self.gateway = ApiClient::new(self.config.base_address.clone());
    }

    // --- Connect ---

    /// Fold the health-probe outcome into state. Returns whether the probe
    /// succeeded, i.e. whether a feed load should follow.
    pub fn apply_connect_outcome(&mut self, outcome: Result<(), ApiError>) -> bool {
        match outcome {
            Ok(()) => {
                tracing::info!(base = %self.config.base_address, "connected");
                self.status = Some(Status::success(format!(
                    "Connected to {}",
                    self.config.base_address
                )));
                true
            }
            Err(err) => {
                tracing::warn!(base = %self.config.base_address, %err, "connection failed");
                self.status = Some(Status::error(format!("Connection failed: {err}")));
                false
            }
        }
    }

    /// Point the session at `raw_address`, probe `/health`, and load the
    /// feed if the service answered.
    pub async fn connect(&mut self, raw_address: &str) {
        self.set_base_address(raw_address);
        let outcome = self.gateway.health().await;
        if self.apply_connect_outcome(outcome) {
            self.load_feed().await;
        }
    }

    // --- Feed ---

    pub fn begin_feed_load(&mut self) -> LoadTicket {
        self.feed.begin_load()
    }

    /// Fold a settled feed load into state. Superseded loads are discarded
    /// wholesale. Success replaces the posts and withdraws a lingering error
    /// status without fabricating a success one; failure keeps the stale
    /// posts and reports the error.
    pub fn apply_feed_outcome(&mut self, ticket: LoadTicket, outcome: Result<Vec<Post>, ApiError>) {
        if !self.feed.is_current(ticket) {
            tracing::debug!("discarding superseded feed load");
            return;
        }
        match outcome {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "feed loaded");
                self.feed.settle(ticket, Some(posts));
                if self.status.as_ref().is_some_and(Status::is_error) {
                    self.status = None;
                }
            }
            Err(err) => {
                tracing::warn!(%err, "feed load failed");
                self.feed.settle(ticket, None);
                self.status = Some(Status::error(format!("Failed loading posts: {err}")));
            }
        }
    }

    /// Fetch the first feed page and replace the local copy with it. The
    /// in-flight flag clears however the request settles.
    pub async fn load_feed(&mut self) {
        let ticket = self.begin_feed_load();
        let outcome = self.gateway.list_posts().await;
        self.apply_feed_outcome(ticket, outcome);
    }

    // --- Registration ---

    /// Fold a registration outcome into state. Success clears all three
    /// credential fields and seeds the post draft's author id with the new
    /// user id; failure leaves the draft for correction.
    pub fn apply_registration_outcome(&mut self, outcome: Result<CreatedUser, ApiError>) {
        match outcome {
            Ok(user) => {
                tracing::info!(user_id = user.id, "registered");
                self.credentials.clear();
                self.post_draft.author_id = user.id.to_string();
                let text = match &user.username {
                    Some(name) => format!("Registered user #{} ({name})", user.id),
                    None => format!("Registered user #{}", user.id),
                };
                self.status = Some(Status::success(text));
            }
            Err(err) => {
                tracing::warn!(%err, "registration failed");
                self.status = Some(Status::error(err.to_string()));
            }
        }
    }

    /// Submit the registration form.
    pub async fn register(&mut self) {
        let request = self.credentials.to_request();
        let outcome = self.gateway.register(&request).await;
        self.apply_registration_outcome(outcome);
    }

    // --- Publishing ---

    /// Fold a publish outcome into state. Returns whether a feed reload
    /// should follow. Success clears the content draft only; the author id
    /// stays for rapid reposting.
    pub fn apply_publish_outcome(&mut self, outcome: Result<CreatedPost, ApiError>) -> bool {
        match outcome {
            Ok(created) => {
                tracing::info!(post_id = created.id, "published");
                self.post_draft.content.clear();
                self.status = Some(Status::success(format!("Published post #{}", created.id)));
                true
            }
            Err(err) => {
                tracing::warn!(%err, "publish failed");
                self.status = Some(Status::error(err.to_string()));
                false
            }
        }
    }

    /// Submit the post form; a successful publish is followed by a feed
    /// reload so the new post shows up without further action.
    pub async fn publish(&mut self) {
        let payload = self.post_draft.payload();
        let outcome = self.gateway.create_post(&payload).await;
        if self.apply_publish_outcome(outcome) {
            self.load_feed().await;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusKind;

    fn post(id: i64) -> Post {
        Post {
            id,
            author_id: 1,
            content: format!("post {id}"),
            created_at: None,
        }
    }

    #[test]
    fn normalize_trims_and_strips_one_trailing_slash() {
        assert_eq!(
            SessionConfig::normalize("  http://localhost:8000/  "),
            "http://localhost:8000"
        );
        assert_eq!(
            SessionConfig::normalize("http://localhost:8000//"),
            "http://localhost:8000/"
        );
        assert_eq!(
            SessionConfig::normalize("http://localhost:8000"),
            "http://localhost:8000"
        );
    }

    #[test]
    fn set_base_address_rebuilds_gateway() {
        let mut session = Session::default();
        session.set_base_address("http://10.0.0.1:9000/");
        assert_eq!(session.config.base_address, "http://10.0.0.1:9000");
        assert_eq!(session.gateway().base_url(), "http://10.0.0.1:9000");
    }

    #[test]
    fn failed_connect_keeps_committed_address() {
        let mut session = Session::default();
        session.set_base_address("http://10.0.0.1:9000");
        let ok = session.apply_connect_outcome(Err(ApiError::Network("refused".to_string())));
        assert!(!ok);
        assert_eq!(session.config.base_address, "http://10.0.0.1:9000");
        let status = session.status.expect("status set");
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Connection failed: "));
    }

    #[test]
    fn registration_success_clears_credentials_and_seeds_author_id() {
        let mut session = Session::default();
        session.credentials = CredentialsDraft {
            email: "a@b.c".to_string(),
            username: "alice".to_string(),
            password: "pw".to_string(),
        };
        session.apply_registration_outcome(Ok(CreatedUser {
            id: 7,
            username: Some("alice".to_string()),
        }));

        assert_eq!(session.credentials, CredentialsDraft::default());
        assert_eq!(session.post_draft.author_id, "7");
        let status = session.status.expect("status set");
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.text, "Registered user #7 (alice)");
    }

    #[test]
    fn registration_failure_leaves_drafts_untouched() {
        let mut session = Session::default();
        session.credentials.email = "a@b.c".to_string();
        session.apply_registration_outcome(Err(ApiError::Http {
            status: 400,
            detail: Some("email taken".to_string()),
        }));

        assert_eq!(session.credentials.email, "a@b.c");
        let status = session.status.expect("status set");
        assert_eq!(status.text, "email taken");
    }

    #[test]
    fn publish_success_clears_content_but_not_author_id() {
        let mut session = Session::default();
        session.post_draft = PostDraft {
            author_id: "7".to_string(),
            content: "hi".to_string(),
        };
        let reload = session.apply_publish_outcome(Ok(CreatedPost { id: 42 }));

        assert!(reload);
        assert_eq!(session.post_draft.author_id, "7");
        assert!(session.post_draft.content.is_empty());
        assert_eq!(session.status.expect("status set").text, "Published post #42");
    }

    #[test]
    fn overlapping_feed_loads_resolve_last_write_wins() {
        let mut session = Session::default();
        let older = session.begin_feed_load();
        let newer = session.begin_feed_load();

        session.apply_feed_outcome(newer, Ok(vec![post(2)]));
        session.apply_feed_outcome(older, Ok(vec![post(1)]));

        assert_eq!(session.feed.posts, vec![post(2)]);
        assert!(!session.feed.is_loading);
    }

    #[test]
    fn feed_success_withdraws_error_status_but_stays_silent_otherwise() {
        let mut session = Session::default();
        session.status = Some(Status::error("old failure"));
        let ticket = session.begin_feed_load();
        session.apply_feed_outcome(ticket, Ok(vec![]));
        assert!(session.status.is_none());

        session.status = Some(Status::success("Published post #42"));
        let ticket = session.begin_feed_load();
        session.apply_feed_outcome(ticket, Ok(vec![]));
        assert_eq!(
            session.status.expect("status kept").text,
            "Published post #42"
        );
    }

    #[test]
    fn feed_failure_keeps_posts_and_prefixes_the_error() {
        let mut session = Session::default();
        let ticket = session.begin_feed_load();
        session.apply_feed_outcome(ticket, Ok(vec![post(1), post(2), post(3)]));

        let ticket = session.begin_feed_load();
        session.apply_feed_outcome(
            ticket,
            Err(ApiError::Http {
                status: 500,
                detail: Some("boom".to_string()),
            }),
        );

        assert_eq!(session.feed.posts.len(), 3);
        assert_eq!(
            session.status.expect("status set").text,
            "Failed loading posts: boom"
        );
    }
}
