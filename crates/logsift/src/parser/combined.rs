//! Scanner for the nginx "combined" access-log line format:
//!
//! ```text
//! $remote_addr - $remote_user [$time_local] "$request" $status $body_bytes_sent
//! "$http_referer" "$http_user_agent"
//! ```
//!
//! Matching is strict about the grammar but prefix-based: content after the
//! final quoted field is tolerated, as the original tool's matcher was.

use super::model::RequestLine;

/// Borrowed field slices of one matched line.
#[derive(Debug, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub remote_addr: &'a str,
    pub remote_user: &'a str,
    pub time_local: &'a str,
    pub request: &'a str,
    pub status: &'a str,
    pub body_bytes_sent: &'a str,
    pub referer: &'a str,
    pub user_agent: &'a str,
}

/// Match a line against the combined grammar. `None` means mismatch.
pub fn match_combined(line: &str) -> Option<RawLine<'_>> {
    let mut cur = Cursor::new(line);

    let remote_addr = cur.token()?;
    cur.whitespace()?;
    // identd is always the literal `-` and is discarded
    if cur.token()? != "-" {
        return None;
    }
    cur.whitespace()?;
    let remote_user = cur.token()?;
    cur.whitespace()?;
    let time_local = cur.bracketed()?;
    cur.whitespace()?;
    let request = cur.quoted()?;
    cur.whitespace()?;
    let status = cur.three_digits()?;
    cur.whitespace()?;
    let body_bytes_sent = cur.token()?;
    cur.whitespace()?;
    let referer = cur.quoted()?;
    cur.whitespace()?;
    let user_agent = cur.quoted()?;

    Some(RawLine {
        remote_addr,
        remote_user,
        time_local,
        request,
        status,
        body_bytes_sent,
        referer,
        user_agent,
    })
}

/// Split the quoted request line into method, path and protocol.
///
/// Only the first token after the method becomes the path; the protocol is
/// the last token that case-insensitively starts with `HTTP/`, scanned from
/// the end so any number of middle tokens is tolerated.
pub fn parse_request(request: &str) -> RequestLine {
    let mut parts = request.split_whitespace();
    let method = parts.next().map(str::to_string);
    let path = parts.next().map(str::to_string);
    let protocol = request
        .split_whitespace()
        .rev()
        .find(|tok| tok.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")))
        .map(str::to_string);

    RequestLine {
        method,
        path,
        protocol,
    }
}

/// Status token to integer, 0 when unparsable.
pub fn parse_status(token: &str) -> u16 {
    token.parse().unwrap_or(0)
}

/// Body-bytes token to integer. Only all-digit tokens count; `-` and
/// anything else normalize to 0.
pub fn parse_body_bytes(token: &str) -> u64 {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().unwrap_or(0)
    } else {
        0
    }
}

/// `-` placeholder to absent.
pub fn optional_field(token: &str) -> Option<String> {
    if token == "-" {
        None
    } else {
        Some(token.to_string())
    }
}

/// Referer: `-` and empty both mean absent.
pub fn optional_referer(token: &str) -> Option<String> {
    if token == "-" || token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    /// A maximal non-empty run of non-whitespace.
    fn token(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (tok, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(tok)
    }

    /// One or more whitespace characters.
    fn whitespace(&mut self) -> Option<()> {
        let trimmed = self.rest.trim_start();
        if trimmed.len() == self.rest.len() {
            return None;
        }
        self.rest = trimmed;
        Some(())
    }

    /// `[ ... ]` with a non-empty body that may not contain `]`.
    fn bracketed(&mut self) -> Option<&'a str> {
        self.rest = self.rest.strip_prefix('[')?;
        let end = self.rest.find(']')?;
        if end == 0 {
            return None;
        }
        let inner = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Some(inner)
    }

    /// `" ... "` with a possibly-empty body that may not contain `"`.
    fn quoted(&mut self) -> Option<&'a str> {
        self.rest = self.rest.strip_prefix('"')?;
        let end = self.rest.find('"')?;
        let inner = &self.rest[..end];
        self.rest = &self.rest[end + 1..];
        Some(inner)
    }

    /// Exactly three ASCII digits; a fourth digit is a mismatch.
    fn three_digits(&mut self) -> Option<&'a str> {
        let bytes = self.rest.as_bytes();
        if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
            return None;
        }
        if bytes.get(3).is_some_and(u8::is_ascii_digit) {
            return None;
        }
        let (digits, rest) = self.rest.split_at(3);
        self.rest = rest;
        Some(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMBINED: &str = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] \
        \"GET / HTTP/1.1\" 200 1450 \"-\" \"Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.6045.200 Safari/537.36\"";

    #[test]
    fn test_match_combined_full() {
        let raw = match_combined(COMBINED).unwrap();
        assert_eq!(raw.remote_addr, "203.0.113.10");
        assert_eq!(raw.remote_user, "-");
        assert_eq!(raw.time_local, "12/Sep/2025:09:12:03 +0800");
        assert_eq!(raw.request, "GET / HTTP/1.1");
        assert_eq!(raw.status, "200");
        assert_eq!(raw.body_bytes_sent, "1450");
        assert_eq!(raw.referer, "-");
        assert!(raw.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_match_combined_with_user_and_referer() {
        let line = "127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] \
            \"POST /api/v1/data HTTP/1.1\" 201 1024 \"https://example.com\" \"curl/7.68.0\"";
        let raw = match_combined(line).unwrap();
        assert_eq!(raw.remote_user, "frank");
        assert_eq!(raw.referer, "https://example.com");
        assert_eq!(raw.user_agent, "curl/7.68.0");
    }

    #[test]
    fn test_unquoted_request_rejected() {
        // Common-log-style line without the quoted request
        let line = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] GET / HTTP/1.1 200 1450 \"-\" \"UA\"";
        assert!(match_combined(line).is_none());
    }

    #[test]
    fn test_common_log_format_rejected() {
        // Combined requires referer and user-agent fields
        let line = "127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] \"GET /apache_pb.gif HTTP/1.0\" 200 2326";
        assert!(match_combined(line).is_none());
    }

    #[test]
    fn test_identd_must_be_dash() {
        let line = "203.0.113.10 x - [12/Sep/2025:09:12:03 +0800] \"GET / HTTP/1.1\" 200 0 \"-\" \"UA\"";
        assert!(match_combined(line).is_none());
    }

    #[test]
    fn test_status_must_be_exactly_three_digits() {
        for status in ["20", "2000", "20x", "abc"] {
            let line = format!(
                "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] \"GET / HTTP/1.1\" {status} 0 \"-\" \"UA\""
            );
            assert!(match_combined(&line).is_none(), "status token: {status}");
        }
    }

    #[test]
    fn test_empty_quoted_fields_allowed() {
        let line = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] \"\" 200 0 \"\" \"\"";
        let raw = match_combined(line).unwrap();
        assert_eq!(raw.request, "");
        assert_eq!(raw.referer, "");
        assert_eq!(raw.user_agent, "");
    }

    #[test]
    fn test_trailing_content_tolerated() {
        let line = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800] \"GET / HTTP/1.1\" 200 0 \"-\" \"UA\" extra stuff";
        assert!(match_combined(line).is_some());
    }

    #[test]
    fn test_multiple_spaces_between_fields() {
        let line = "203.0.113.10  -   - [12/Sep/2025:09:12:03 +0800]  \"GET / HTTP/1.1\"  200  0  \"-\"  \"UA\"";
        assert!(match_combined(line).is_some());
    }

    #[test]
    fn test_unterminated_time_bracket_rejected() {
        let line = "203.0.113.10 - - [12/Sep/2025:09:12:03 +0800 \"GET / HTTP/1.1\" 200 0 \"-\" \"UA\"";
        assert!(match_combined(line).is_none());
    }

    #[test]
    fn test_empty_time_bracket_rejected() {
        let line = "203.0.113.10 - - [] \"GET / HTTP/1.1\" 200 0 \"-\" \"UA\"";
        assert!(match_combined(line).is_none());
    }

    #[test]
    fn test_leading_whitespace_rejected() {
        assert!(match_combined(&format!(" {COMBINED}")).is_none());
    }

    // ── request-line split ──────────────────────────────────────

    #[test]
    fn test_parse_request_simple() {
        let req = parse_request("GET / HTTP/1.1");
        assert_eq!(req.method.as_deref(), Some("GET"));
        assert_eq!(req.path.as_deref(), Some("/"));
        assert_eq!(req.protocol.as_deref(), Some("HTTP/1.1"));
    }

    #[test]
    fn test_parse_request_space_in_path_keeps_first_token() {
        let req = parse_request("GET /reports Q1 HTTP/1.1");
        assert_eq!(req.method.as_deref(), Some("GET"));
        assert_eq!(req.path.as_deref(), Some("/reports"));
        assert_eq!(req.protocol.as_deref(), Some("HTTP/1.1"));
    }

    #[test]
    fn test_parse_request_http2() {
        let req = parse_request("GET /dashboard HTTP/2.0");
        assert_eq!(req.protocol.as_deref(), Some("HTTP/2.0"));
    }

    #[test]
    fn test_parse_request_protocol_case_insensitive() {
        let req = parse_request("GET / http/1.0");
        assert_eq!(req.protocol.as_deref(), Some("http/1.0"));
    }

    #[test]
    fn test_parse_request_partial() {
        let req = parse_request("GET");
        assert_eq!(req.method.as_deref(), Some("GET"));
        assert_eq!(req.path, None);
        assert_eq!(req.protocol, None);
    }

    #[test]
    fn test_parse_request_empty() {
        assert_eq!(parse_request(""), RequestLine::default());
    }

    // ── numeric and placeholder normalization ───────────────────

    #[test]
    fn test_parse_status_token() {
        assert_eq!(parse_status("200"), 200);
        assert_eq!(parse_status("404"), 404);
        assert_eq!(parse_status("xyz"), 0);
    }

    #[test]
    fn test_parse_body_bytes_token() {
        assert_eq!(parse_body_bytes("1450"), 1450);
        assert_eq!(parse_body_bytes("0"), 0);
        assert_eq!(parse_body_bytes("-"), 0);
        assert_eq!(parse_body_bytes(""), 0);
        assert_eq!(parse_body_bytes("12ab"), 0);
    }

    #[test]
    fn test_placeholder_normalization() {
        assert_eq!(optional_field("-"), None);
        assert_eq!(optional_field("frank"), Some("frank".to_string()));
        assert_eq!(optional_referer("-"), None);
        assert_eq!(optional_referer(""), None);
        assert_eq!(
            optional_referer("https://example.com"),
            Some("https://example.com".to_string())
        );
    }
}
