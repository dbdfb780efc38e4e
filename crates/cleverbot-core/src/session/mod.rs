//! Per-conversation state: transcript, session id and cookie jar.
//!
//! One [`ConversationState`] lives for the lifetime of a conversation and is
//! never persisted. Independent states share nothing.

pub mod state;

pub use state::{ConversationState, CookieJar, SessionPhase};
