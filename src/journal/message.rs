//! Journal message decoding.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Terminal color/control escape sequences (CSI form).
static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid ANSI pattern"));

/// One parsed journal entry. Immutable once constructed.
///
/// `cursor` is an opaque position token usable to resume reading after
/// this entry. Fields absent from the raw line are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalMsg {
    pub message: String,
    pub timestamp: String,
    pub job_type: String,
    pub transport: String,
    pub cursor: String,
    pub exit_status: String,
    pub exit_code: String,
}

impl JournalMsg {
    /// Decode one JSON journal line.
    ///
    /// The tool emits `MESSAGE` either as a string or, when the payload is
    /// not valid UTF-8, as an array of byte values; string decoding is tried
    /// first with a byte-array fallback. Terminal escape sequences are
    /// stripped from the resulting text.
    pub fn decode(line: &str) -> Result<Self> {
        let raw: RawMsg = serde_json::from_str(line).map_err(|e| Error::Decode {
            message: format!("invalid journal line: {}", e),
        })?;

        let text = match raw.message {
            MessageField::Text(s) => s,
            MessageField::Bytes(b) => String::from_utf8_lossy(&b).into_owned(),
        };

        Ok(Self {
            message: strip_ansi(&text),
            timestamp: raw.timestamp,
            job_type: raw.job_type,
            transport: raw.transport,
            cursor: raw.cursor,
            exit_status: raw.exit_status,
            exit_code: raw.exit_code,
        })
    }
}

/// `MESSAGE` as the tool emits it: a UTF-8 string, or raw bytes when the
/// payload is not valid UTF-8.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    Text(String),
    Bytes(Vec<u8>),
}

impl Default for MessageField {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Deserialize)]
struct RawMsg {
    #[serde(rename = "MESSAGE", default)]
    message: MessageField,
    #[serde(rename = "__REALTIME_TIMESTAMP", default)]
    timestamp: String,
    #[serde(rename = "JOB_TYPE", default)]
    job_type: String,
    #[serde(rename = "_TRANSPORT", default)]
    transport: String,
    #[serde(rename = "__CURSOR", default)]
    cursor: String,
    #[serde(rename = "EXIT_STATUS", default)]
    exit_status: String,
    #[serde(rename = "EXIT_CODE", default)]
    exit_code: String,
}

fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string_message() {
        let msg = JournalMsg::decode(
            r#"{"MESSAGE":"started","__REALTIME_TIMESTAMP":"1700000000000000","_TRANSPORT":"journal","__CURSOR":"s=abc","JOB_TYPE":"start","EXIT_STATUS":"0","EXIT_CODE":"exited"}"#,
        )
        .unwrap();
        assert_eq!(msg.message, "started");
        assert_eq!(msg.timestamp, "1700000000000000");
        assert_eq!(msg.transport, "journal");
        assert_eq!(msg.cursor, "s=abc");
        assert_eq!(msg.job_type, "start");
        assert_eq!(msg.exit_status, "0");
        assert_eq!(msg.exit_code, "exited");
    }

    #[test]
    fn test_decode_strips_color_escapes() {
        let msg = JournalMsg::decode(r#"{"MESSAGE":"hello\u001b[31mworld"}"#).unwrap();
        assert_eq!(msg.message, "helloworld");
    }

    #[test]
    fn test_decode_byte_array_message() {
        let msg = JournalMsg::decode(r#"{"MESSAGE":[104,101,108,108,111]}"#).unwrap();
        assert_eq!(msg.message, "hello");
    }

    #[test]
    fn test_decode_missing_fields_default_empty() {
        let msg = JournalMsg::decode(r#"{"MESSAGE":"x"}"#).unwrap();
        assert_eq!(msg.message, "x");
        assert_eq!(msg.cursor, "");
        assert_eq!(msg.exit_status, "");
    }

    #[test]
    fn test_decode_rejects_raw_control_byte() {
        // JSON forbids unescaped control characters inside strings; the
        // tool emits them in backslash-u escaped form.
        let line = format!("{{\"MESSAGE\":\"a{}b\"}}", '\u{1b}');
        assert!(matches!(
            JournalMsg::decode(&line),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_line() {
        let err = JournalMsg::decode("not json").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_strip_ansi_reset_sequence() {
        assert_eq!(strip_ansi("\u{1b}[0;32mok\u{1b}[0m"), "ok");
    }
}
