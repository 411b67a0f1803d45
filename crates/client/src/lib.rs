//! Pulse client library.
//!
//! Everything between the operator's keystrokes and the remote API lives
//! here: the HTTP gateway, the session with its four flows (connect, feed
//! load, register, publish), and the transient state those flows keep in
//! sync. The terminal front end in [`ui`] is a thin shell over [`session`].

pub mod api_client;
pub mod session;
pub mod state;
pub mod ui;

pub use api_client::ApiClient;
pub use session::{Session, SessionConfig, DEFAULT_BASE_ADDRESS};
pub use state::{CredentialsDraft, FeedState, LoadTicket, PostDraft, Status, StatusKind};
