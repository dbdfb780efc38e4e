//! Errors raised while decoding the service's replies.

use thiserror::Error;

/// The reply body does not follow the positional field contract.
///
/// This means the service changed its format; there is no local recovery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The body contained no segment at all.
    #[error("empty reply body")]
    EmptyBody,

    /// The first segment carried fewer than the three required fields.
    #[error("reply segment has {found} field(s), expected at least 3")]
    MissingFields { found: usize },
}
