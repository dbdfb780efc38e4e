//! Protocol core for the Cleverbot web service.
//!
//! Everything here is free of I/O: the HTTP exchange itself lives in
//! `cleverbot-client`.
//!
//! # Architecture
//!
//! - [`session::ConversationState`] — transcript, session id and cookie jar of one conversation
//! - [`payload::RequestPayload`] — the ordered form fields sent on each turn, plus the `icognocheck` token
//! - [`response::parse_response`] — decoder for the carriage-return delimited reply body
//! - [`protocol`] — fixed wire constants (endpoint, headers, field values)
//! - [`config`] — client configuration schema and loader

pub mod config;
pub mod error;
pub mod payload;
pub mod protocol;
pub mod response;
pub mod session;
pub mod utils;

pub use config::{load_config, ClientConfig, RequestMethod};
pub use error::ProtocolError;
pub use payload::{integrity_token, RequestPayload, FIELD_ORDER};
pub use response::{parse_response, BotReply};
pub use session::{ConversationState, CookieJar, SessionPhase};
