//! Decoder for the service's reply body.
//!
//! The body is not JSON: top-level segments are separated by six carriage
//! returns, fields inside a segment by a single one. The first segment is
//! positional: `[answer, conversation id, conversation log id, ...]`.

use crate::error::ProtocolError;
use crate::protocol::{FIELD_DELIMITER, SEGMENT_DELIMITER};

/// A decoded reply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BotReply {
    /// The bot's reply text.
    pub answer: String,
    /// Session continuation token.
    pub conversation_id: String,
    pub conversation_log_id: String,
    /// Last field of the second segment, when there is one. Not interpreted.
    pub unknown: Option<String>,
}

/// Parse a raw reply body.
///
/// Only an empty trailing segment (left by a terminal delimiter) is dropped.
pub fn parse_response(body: &str) -> Result<BotReply, ProtocolError> {
    let mut segments: Vec<&str> = body.split(SEGMENT_DELIMITER).collect();
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    let first = segments.first().ok_or(ProtocolError::EmptyBody)?;
    let fields: Vec<&str> = first.split(FIELD_DELIMITER).collect();
    let [answer, conversation_id, conversation_log_id, ..] = fields.as_slice() else {
        return Err(ProtocolError::MissingFields {
            found: fields.len(),
        });
    };

    let unknown = segments
        .get(1)
        .and_then(|segment| segment.split(FIELD_DELIMITER).last())
        .map(String::from);

    Ok(BotReply {
        answer: answer.to_string(),
        conversation_id: conversation_id.to_string(),
        conversation_log_id: conversation_log_id.to_string(),
        unknown,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
