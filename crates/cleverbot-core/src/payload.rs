//! The form payload sent on every turn, and its `icognocheck` integrity token.
//!
//! The service checks `icognocheck` against an MD5 over a fixed byte window
//! of the URL-encoded form. The window position only makes sense for the
//! field order in [`FIELD_ORDER`], so the two must change together.

use md5::{Digest, Md5};
use url::form_urlencoded;

use crate::protocol::{self, HISTORY_WINDOW, TOKEN_LEN, TOKEN_OFFSET};
use crate::session::ConversationState;

/// Wire order of the form fields. The integrity token depends on it.
pub const FIELD_ORDER: [&str; 23] = [
    "stimulus",
    "start",
    "sessionid",
    "vText8",
    "vText7",
    "vText6",
    "vText5",
    "vText4",
    "vText3",
    "vText2",
    "icognoid",
    "icognocheck",
    "fno",
    "prevref",
    "emotionaloutput",
    "emotionalhistory",
    "asbotname",
    "ttsvoice",
    "typing",
    "lineref",
    "sub",
    "islearning",
    "cleanslate",
];

// ─────────────────────────────────────────────
// RequestPayload
// ─────────────────────────────────────────────

/// Variable fields of one request. Constant fields come from [`protocol`].
///
/// Rebuilt from [`ConversationState`] on every turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestPayload {
    /// The question being asked.
    pub stimulus: String,
    pub session_id: String,
    /// History slots, most recent first: index 0 is `vText2`, index 6 is `vText8`.
    pub history: [String; HISTORY_WINDOW],
    /// Empty until [`seal`](Self::seal) computes it.
    pub icognocheck: String,
    pub prevref: String,
    pub lineref: String,
}

impl RequestPayload {
    /// Build the payload for `question` from the conversation so far.
    ///
    /// Unused history slots stay empty.
    pub fn build(state: &ConversationState, question: &str) -> Self {
        let mut history: [String; HISTORY_WINDOW] = Default::default();
        for (slot, line) in history.iter_mut().zip(state.history_window()) {
            *slot = line.to_string();
        }

        Self {
            stimulus: question.to_string(),
            session_id: state.session_id().to_string(),
            history,
            ..Self::default()
        }
    }

    /// Value of the `vText{n}` slot, `n` in `2..=8`.
    pub fn history_slot(&self, n: usize) -> Option<&str> {
        n.checked_sub(2)
            .and_then(|i| self.history.get(i))
            .map(String::as_str)
    }

    /// All fields as `(name, value)` pairs in [`FIELD_ORDER`].
    pub fn fields(&self) -> [(&'static str, &str); 23] {
        let h = &self.history;
        [
            ("stimulus", self.stimulus.as_str()),
            ("start", protocol::START),
            ("sessionid", self.session_id.as_str()),
            ("vText8", h[6].as_str()),
            ("vText7", h[5].as_str()),
            ("vText6", h[4].as_str()),
            ("vText5", h[3].as_str()),
            ("vText4", h[2].as_str()),
            ("vText3", h[1].as_str()),
            ("vText2", h[0].as_str()),
            ("icognoid", protocol::ICOGNOID),
            ("icognocheck", self.icognocheck.as_str()),
            ("fno", protocol::FNO),
            ("prevref", self.prevref.as_str()),
            ("emotionaloutput", ""),
            ("emotionalhistory", ""),
            ("asbotname", ""),
            ("ttsvoice", ""),
            ("typing", ""),
            ("lineref", self.lineref.as_str()),
            ("sub", protocol::SUB),
            ("islearning", protocol::ISLEARNING),
            ("cleanslate", protocol::CLEANSLATE),
        ]
    }

    /// `application/x-www-form-urlencoded` serialization in wire order.
    ///
    /// `*` is escaped as `%2A` on top of the WHATWG form rules; the service
    /// digests the escaped form.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields())
            .finish()
            .replace('*', "%2A")
    }

    /// Compute the token over the unsealed form and store it.
    pub fn seal(mut self) -> Self {
        self.icognocheck.clear();
        self.icognocheck = integrity_token(&self.encode());
        self
    }
}

/// MD5 (lowercase hex) of the fixed byte window of an encoded form.
///
/// A shorter input is digested as far as it reaches.
pub fn integrity_token(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let end = (TOKEN_OFFSET + TOKEN_LEN).min(bytes.len());
    let start = TOKEN_OFFSET.min(end);
    format!("{:x}", Md5::digest(&bytes[start..end]))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_wire_order() {
        let payload = RequestPayload::default();
        let names: Vec<&str> = payload.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, FIELD_ORDER);
    }

    #[test]
    fn test_constants_verbatim() {
        let encoded = RequestPayload::default().encode();
        assert!(encoded.contains("&start=y&"));
        assert!(encoded.contains("&icognoid=wsf&"));
        assert!(encoded.contains("&fno=0&"));
        assert!(encoded.contains("&sub=Say&"));
        assert!(encoded.contains("&islearning=1&"));
        assert!(encoded.ends_with("&cleanslate=false"));
    }

    #[test]
    fn test_build_fills_slots_most_recent_first() {
        let mut state = ConversationState::new();
        state.record_question("hi");
        state.record_answer("hello");
        state.record_question("how are you?");

        let payload = RequestPayload::build(&state, "how are you?");
        assert_eq!(payload.stimulus, "how are you?");
        assert_eq!(payload.history_slot(2), Some("hello"));
        assert_eq!(payload.history_slot(3), Some("hi"));
        assert_eq!(payload.history_slot(4), Some(""));
        assert_eq!(payload.history_slot(8), Some(""));
        assert_eq!(payload.history_slot(9), None);
        assert_eq!(payload.history_slot(1), None);
    }

    #[test]
    fn test_build_keeps_only_seven_turns() {
        let mut state = ConversationState::new();
        for i in 0..6 {
            state.record_question(format!("q{i}"));
            state.record_answer(format!("a{i}"));
        }
        let payload = RequestPayload::build(&state, "next");
        assert_eq!(payload.history_slot(2), Some("a5"));
        assert_eq!(payload.history_slot(8), Some("a2"));
    }

    #[test]
    fn test_build_copies_session_id() {
        let state = ConversationState::with_session_id("WXYZ");
        let payload = RequestPayload::build(&state, "q");
        assert!(payload.encode().contains("&sessionid=WXYZ&"));
    }

    #[test]
    fn test_encode_escapes_values() {
        let payload = RequestPayload {
            stimulus: "how are you today?".into(),
            ..Default::default()
        };
        assert!(payload.encode().starts_with("stimulus=how+are+you+today%3F&start=y"));
    }

    #[test]
    fn test_token_known_value() {
        let payload = RequestPayload {
            stimulus: "Hello".into(),
            ..Default::default()
        };
        // Window is "Hello&start=y&sessionid=&v".
        assert_eq!(
            integrity_token(&payload.encode()),
            "e50e0cff516d2a5a85394cf4f88d9bba"
        );
    }

    #[test]
    fn test_token_window_after_escaping() {
        let payload = RequestPayload {
            stimulus: "how are you today?".into(),
            ..Default::default()
        };
        // Window is "how+are+you+today%3F&start".
        assert_eq!(
            integrity_token(&payload.encode()),
            "19adf1e40b3863b0b8e2f887b4dd09ad"
        );
    }

    #[test]
    fn test_encode_escapes_asterisk() {
        let payload = RequestPayload {
            stimulus: "2*3 is?".into(),
            lineref: "*".into(),
            ..Default::default()
        };
        let encoded = payload.encode();
        assert!(encoded.starts_with("stimulus=2%2A3+is%3F&start=y"));
        assert!(encoded.contains("&lineref=%2A&"));
        assert!(!encoded.contains('*'));
        // Window is "2%2A3+is%3F&start=y&sessio".
        assert_eq!(integrity_token(&encoded), "02953847ef067817ba21ec8931437c2a");
    }

    #[test]
    fn test_token_deterministic_and_sensitive() {
        let token = |stimulus: &str| {
            RequestPayload {
                stimulus: stimulus.into(),
                ..Default::default()
            }
            .seal()
            .icognocheck
        };
        assert_eq!(token("same"), token("same"));
        assert_ne!(token("same"), token("samf"));
    }

    #[test]
    fn test_seal_ignores_previous_token() {
        let fresh = RequestPayload {
            stimulus: "Hello".into(),
            ..Default::default()
        };
        let stale = RequestPayload {
            icognocheck: "stale".into(),
            ..fresh.clone()
        };
        assert_eq!(fresh.seal(), stale.seal());
    }

    #[test]
    fn test_sealed_form_carries_token() {
        let sealed = RequestPayload {
            stimulus: "Hello".into(),
            ..Default::default()
        }
        .seal();
        assert_eq!(sealed.icognocheck.len(), 32);
        assert!(sealed
            .encode()
            .contains("&icognocheck=e50e0cff516d2a5a85394cf4f88d9bba&"));
    }

    #[test]
    fn test_token_on_short_input() {
        assert_eq!(integrity_token(""), format!("{:x}", Md5::digest(b"")));
        assert_eq!(integrity_token("stimulus=ab"), format!("{:x}", Md5::digest(b"ab")));
    }
}
