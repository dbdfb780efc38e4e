//! Mutable record behind a single conversation.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::protocol::HISTORY_WINDOW;

/// Cookie name → value, ordered by name so the `Cookie` header is stable.
pub type CookieJar = BTreeMap<String, String>;

/// Whether the service has started tracking this conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session id established yet.
    Fresh,
    /// A session id is set and is sent with every request.
    Active,
}

// ─────────────────────────────────────────────
// ConversationState
// ─────────────────────────────────────────────

/// Transcript, session id and cookies of one conversation.
#[derive(Clone, Debug, Default)]
pub struct ConversationState {
    /// Alternating question/answer turns, append-only.
    history: Vec<String>,
    /// Service-assigned id, empty while [`SessionPhase::Fresh`].
    session_id: String,
    /// Accumulated cookies from every response.
    cookies: CookieJar,
    /// The last history entry is a question still awaiting its answer.
    in_flight: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in the Active phase with a previously issued session id.
    pub fn with_session_id(id: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.open_session(id);
        state
    }

    /// Append the question being asked.
    ///
    /// It stays out of [`history_window`](Self::history_window) until it is
    /// answered or abandoned.
    pub fn record_question(&mut self, text: impl Into<String>) {
        self.history.push(text.into());
        self.in_flight = true;
    }

    /// Append the bot's answer.
    pub fn record_answer(&mut self, text: impl Into<String>) {
        self.history.push(text.into());
        self.in_flight = false;
    }

    /// Give up on the pending question without recording an answer.
    ///
    /// The question stays in the transcript and becomes ordinary context for
    /// the next turn.
    pub fn abandon_question(&mut self) {
        self.in_flight = false;
    }

    /// Up to seven prior turns, most recent first.
    ///
    /// A question still awaiting its answer is not part of the window.
    pub fn history_window(&self) -> Vec<&str> {
        let settled = if self.in_flight {
            &self.history[..self.history.len() - 1]
        } else {
            &self.history[..]
        };
        settled
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .map(String::as_str)
            .collect()
    }

    /// Explicitly establish a tracked session.
    pub fn open_session(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id.is_empty() {
            return;
        }
        if self.session_id.is_empty() {
            info!(session_id = %id, "session opened");
        }
        self.session_id = id;
    }

    /// Overwrite the session id, but only once a session has been opened.
    ///
    /// While [`SessionPhase::Fresh`] the update is ignored: the service only
    /// continues a session it was explicitly asked to track.
    pub fn update_session_id(&mut self, id: &str) {
        if self.session_id.is_empty() {
            debug!(offered = id, "no tracked session, ignoring conversation id");
            return;
        }
        self.session_id = id.to_string();
    }

    /// Union `cookies` into the jar; later values win for the same name.
    pub fn merge_cookies<I, K, V>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in cookies {
            self.cookies.insert(name.into(), value.into());
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.session_id.is_empty() {
            SessionPhase::Fresh
        } else {
            SessionPhase::Active
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Full transcript in call order.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
