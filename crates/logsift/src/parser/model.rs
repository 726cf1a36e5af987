use serde::Serialize;
use thiserror::Error;

use crate::ua::UaClassification;

/// Why a line could not be parsed.
///
/// The display labels are stable: they are what the error sink writes and
/// what downstream consumers of the original tool already match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("empty line")]
    EmptyLine,

    #[error("regex_mismatch")]
    FormatMismatch,
}

impl ParseFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFailure::EmptyLine => "empty line",
            ParseFailure::FormatMismatch => "regex_mismatch",
        }
    }
}

/// Method / path / protocol split out of the quoted request line.
///
/// `path` is only the first whitespace-delimited token after the method,
/// even when the logged path itself contains spaces; `protocol` is the last
/// token that starts with `HTTP/`, scanned from the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Option<String>,
    pub path: Option<String>,
    pub protocol: Option<String>,
}

/// One line of input, parsed or not.
///
/// Serialized untagged: successful records carry the full field set,
/// failed records carry only `line_number`, `parse_ok`, `raw` and
/// (for grammar mismatches) `error`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParsedRecord {
    Ok(Box<AccessRecord>),
    Failed(FailedRecord),
}

impl ParsedRecord {
    pub fn line_number(&self) -> u64 {
        match self {
            ParsedRecord::Ok(rec) => rec.line_number,
            ParsedRecord::Failed(rec) => rec.line_number,
        }
    }

    pub fn parse_ok(&self) -> bool {
        matches!(self, ParsedRecord::Ok(_))
    }

    pub fn as_access(&self) -> Option<&AccessRecord> {
        match self {
            ParsedRecord::Ok(rec) => Some(rec),
            ParsedRecord::Failed(_) => None,
        }
    }
}

/// A successfully parsed access-log line.
///
/// Field order is the JSON key order emitted downstream.
#[derive(Debug, Clone, Serialize)]
pub struct AccessRecord {
    pub line_number: u64,
    pub parse_ok: bool,

    pub remote_addr: String,
    pub remote_user: Option<String>,

    pub time_local: String,
    pub time_iso_utc: String,

    pub request: String,
    pub method: Option<String>,
    pub path: Option<String>,
    pub protocol: Option<String>,

    pub status: u16,
    pub body_bytes_sent: u64,

    pub http_referer: Option<String>,
    pub http_user_agent: Option<String>,

    pub ua: UaClassification,
}

/// A line the grammar rejected. Derived fields are never present here.
#[derive(Debug, Clone, Serialize)]
pub struct FailedRecord {
    pub line_number: u64,
    pub parse_ok: bool,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailedRecord {
    pub fn empty_line(line_number: u64) -> Self {
        Self {
            line_number,
            parse_ok: false,
            raw: String::new(),
            error: None,
        }
    }

    pub fn mismatch(line_number: u64, raw: &str) -> Self {
        Self {
            line_number,
            parse_ok: false,
            raw: raw.to_string(),
            error: Some("Line does not match Nginx combined format".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_labels() {
        assert_eq!(ParseFailure::EmptyLine.as_str(), "empty line");
        assert_eq!(ParseFailure::FormatMismatch.as_str(), "regex_mismatch");
        assert_eq!(ParseFailure::FormatMismatch.to_string(), "regex_mismatch");
    }

    #[test]
    fn test_empty_line_record_has_no_error_key() {
        let rec = ParsedRecord::Failed(FailedRecord::empty_line(3));
        let json = serde_json::to_value(&rec).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.get("line_number").unwrap(), 3);
        assert_eq!(obj.get("parse_ok").unwrap(), false);
        assert_eq!(obj.get("raw").unwrap(), "");
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("remote_addr"));
    }

    #[test]
    fn test_mismatch_record_carries_error_only() {
        let rec = ParsedRecord::Failed(FailedRecord::mismatch(7, "garbage"));
        let json = serde_json::to_value(&rec).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj.get("raw").unwrap(), "garbage");
        assert_eq!(
            obj.get("error").unwrap(),
            "Line does not match Nginx combined format"
        );
    }
}
