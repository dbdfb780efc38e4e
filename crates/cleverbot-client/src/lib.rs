//! HTTP client for the Cleverbot web service.
//!
//! # Architecture
//!
//! - [`transport::ServiceTransport`] — trait for the two HTTP exchanges the service needs
//! - [`transport::HttpTransport`] — `reqwest` implementation with the browser-mimicking header set
//! - [`bot::Cleverbot`] — conversation facade exposing [`ask`](bot::Cleverbot::ask)
//!
//! [`Cleverbot::from_default_config`] reads `~/.cleverbot/config.json` and
//! `CLEVERBOT_*` env vars; [`Cleverbot::from_config`] takes a built config.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use cleverbot_client::Cleverbot;
//!
//! let mut bot = Cleverbot::new().await?;
//! let answer = bot.ask("Hello there").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod error;
pub mod transport;

pub use bot::Cleverbot;
pub use error::{BootstrapError, ClientError, SetCookies, TransportError};
pub use transport::{Exchange, HttpTransport, ServiceTransport};

pub use cleverbot_core::{BotReply, ClientConfig, ConversationState, ProtocolError, SessionPhase};
