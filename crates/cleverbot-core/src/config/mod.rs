//! Client configuration — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use cleverbot_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Service: {}", cfg.base_url);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{ClientConfig, RequestMethod};
