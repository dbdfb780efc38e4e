//! Fixed wire constants of the Cleverbot web API.
//!
//! The service inspects header shape and field values, so nothing here is
//! meant to be tuned at runtime.

/// Default service origin (scheme + host).
pub const DEFAULT_BASE_URL: &str = "http://www.cleverbot.com";

/// Path of the conversational endpoint, relative to the origin.
pub const ENDPOINT_PATH: &str = "/webservicemin";

/// Separator between top-level segments of a reply body.
pub const SEGMENT_DELIMITER: &str = "\r\r\r\r\r\r";

/// Separator between fields inside one segment.
pub const FIELD_DELIMITER: char = '\r';

/// Number of prior turns transmitted with each request.
pub const HISTORY_WINDOW: usize = 7;

// ─────────────────────────────────────────────
// Headers
// ─────────────────────────────────────────────

pub const USER_AGENT: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.0)";
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_CHARSET: &str = "ISO-8859-1,utf-8;q=0.7,*;q=0.7";
pub const ACCEPT_LANGUAGE: &str = "en-us,en;q=0.8,en-us;q=0.5,en;q=0.3";
pub const CACHE_CONTROL: &str = "no-cache";
pub const PRAGMA: &str = "no-cache";

// ─────────────────────────────────────────────
// Constant form fields
// ─────────────────────────────────────────────

pub const START: &str = "y";
pub const ICOGNOID: &str = "wsf";
pub const FNO: &str = "0";
pub const SUB: &str = "Say";
pub const ISLEARNING: &str = "1";
pub const CLEANSLATE: &str = "false";

// ─────────────────────────────────────────────
// Integrity token window
// ─────────────────────────────────────────────

/// Byte offset into the encoded form where the digested window starts.
///
/// Tied to `FIELD_ORDER`: it skips the leading `stimulus=`.
pub const TOKEN_OFFSET: usize = 9;

/// Length in bytes of the digested window.
pub const TOKEN_LEN: usize = 26;
