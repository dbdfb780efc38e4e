//! Conversation facade.
//!
//! One [`Cleverbot`] is one conversation: it owns the transcript, session id
//! and cookie jar, and performs exactly one round-trip per [`ask`](Cleverbot::ask).
//!
//! Failure policy:
//! - bootstrap failure is logged and ignored, keeping any cookies it set,
//! - transport failure yields an empty answer,
//! - a malformed reply is returned as [`ProtocolError`].

use std::path::Path;

use tracing::{debug, warn};

use cleverbot_core::{
    load_config, parse_response, BotReply, ClientConfig, ConversationState, ProtocolError,
    RequestPayload,
};

use crate::error::{BootstrapError, ClientError, TransportError};
use crate::transport::{HttpTransport, ServiceTransport};

pub struct Cleverbot<T: ServiceTransport = HttpTransport> {
    transport: T,
    state: ConversationState,
    last_reply: Option<BotReply>,
}

impl Cleverbot<HttpTransport> {
    /// Connect to the public service with default settings.
    pub async fn new() -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::default()).await
    }

    /// Build from `~/.cleverbot/config.json` and `CLEVERBOT_*` env vars.
    pub async fn from_default_config() -> Result<Self, ClientError> {
        Self::from_config_file(None).await
    }

    /// Build from a config file (default location when `None`) plus env overrides.
    pub async fn from_config_file(path: Option<&Path>) -> Result<Self, ClientError> {
        Self::from_config(load_config(path)).await
    }

    /// Build a client from `config`, harvesting initial cookies unless
    /// `config.bootstrap` is off.
    pub async fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        let state = match config.session_id {
            Some(ref id) => ConversationState::with_session_id(id.as_str()),
            None => ConversationState::new(),
        };

        let mut bot = Cleverbot::with_transport(transport, state);
        if config.bootstrap {
            if let Err(e) = bot.bootstrap().await {
                warn!(error = %e, "continuing without initial cookies");
            }
        }
        Ok(bot)
    }
}

impl<T: ServiceTransport> Cleverbot<T> {
    /// Wrap an existing transport and state. No network traffic.
    pub fn with_transport(transport: T, state: ConversationState) -> Self {
        Self {
            transport,
            state,
            last_reply: None,
        }
    }

    /// Fetch the service root once and merge the cookies it sets.
    ///
    /// Cookies set before a failure (redirect hops, an error page) are
    /// merged too.
    pub async fn bootstrap(&mut self) -> Result<(), BootstrapError> {
        match self.transport.fetch_root().await {
            Ok(cookies) => {
                debug!(cookies = cookies.len(), "bootstrap cookies collected");
                self.state.merge_cookies(cookies);
                Ok(())
            }
            Err(e) => {
                self.state.merge_cookies(e.0.cookies().iter().cloned());
                Err(e)
            }
        }
    }

    /// Ask a question and return the bot's answer.
    ///
    /// A transport failure returns `Ok("")`; the question stays in the
    /// transcript with no answer after it.
    pub async fn ask(&mut self, question: &str) -> Result<String, ProtocolError> {
        self.state.record_question(question);

        let body = match self.send(question).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "request failed, returning empty answer");
                self.state.abandon_question();
                return Ok(String::new());
            }
        };

        let reply = match parse_response(&body) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "unexpected reply format");
                self.state.abandon_question();
                return Err(e);
            }
        };

        self.state.update_session_id(&reply.conversation_id);
        self.state.record_answer(reply.answer.as_str());
        debug!(
            conversation_id = %reply.conversation_id,
            phase = ?self.state.phase(),
            "reply parsed"
        );

        let answer = reply.answer.clone();
        self.last_reply = Some(reply);
        Ok(answer)
    }

    /// Build, seal and send the payload for `question`; merge every cookie
    /// the service set, even when the exchange failed.
    async fn send(&mut self, question: &str) -> Result<String, TransportError> {
        let payload = RequestPayload::build(&self.state, question).seal();
        debug!(
            window = self.state.history_window().len(),
            phase = ?self.state.phase(),
            "sending question"
        );

        match self.transport.exchange(&payload, self.state.cookies()).await {
            Ok(exchange) => {
                self.state.merge_cookies(exchange.cookies);
                Ok(exchange.body)
            }
            Err(e) => {
                self.state.merge_cookies(e.cookies().iter().cloned());
                Err(e)
            }
        }
    }

    /// Full transcript, questions and answers in call order.
    pub fn conversation(&self) -> &[String] {
        self.state.history()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConversationState {
        &mut self.state
    }

    /// The most recently parsed reply, if any.
    pub fn last_reply(&self) -> Option<&BotReply> {
        self.last_reply.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
