//! Minimal HTTP/1.1 over an already established TLS session.
//!
//! Only one request shape is ever sent and only the first read of the
//! response is inspected, so there is no real parser here.

use sniscan_common::config::ProbeConfig;

/// Size of the single read performed on the response.
pub const RESPONSE_BUFFER_SIZE: usize = 4096;

pub const USER_AGENT: &str = "Mozilla/5.0";

/// `GET {path}` with `Host`, a generic user agent and `Connection: close`.
pub fn build_request(host: &str, path: &str) -> String {
    format!(
        "GET {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Connection: close\r\n\r\n"
    )
}

/// Decodes response bytes, replacing anything that is not valid UTF-8.
pub fn decode_response(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decides whether a response came from the service being searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMatcher {
    status_prefix: String,
    keyword: String,
}

impl ResponseMatcher {
    pub fn new(status_prefix: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            status_prefix: status_prefix.into(),
            keyword: keyword.into(),
        }
    }

    /// True iff both the status line prefix and the keyword appear.
    pub fn is_match(&self, response: &str) -> bool {
        response.contains(&self.status_prefix) && response.contains(&self.keyword)
    }
}

impl From<&ProbeConfig> for ResponseMatcher {
    fn from(cfg: &ProbeConfig) -> Self {
        Self::new(cfg.status_prefix.clone(), cfg.keyword.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_WITH_KEYWORD: &str =
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nworkercheck ok";

    fn matcher() -> ResponseMatcher {
        ResponseMatcher::from(&ProbeConfig::default())
    }

    #[test]
    fn request_is_minimal_get() {
        let req = build_request("workers.uowo.de", "/probe");
        assert_eq!(
            req,
            "GET /probe HTTP/1.1\r\nHost: workers.uowo.de\r\nUser-Agent: Mozilla/5.0\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn matches_only_when_status_and_keyword_present() {
        let m = matcher();
        assert!(m.is_match(OK_WITH_KEYWORD));
        assert!(!m.is_match("HTTP/1.1 200 OK\r\n\r\nhello"));
        assert!(!m.is_match("HTTP/1.1 403 Forbidden\r\n\r\nworkercheck"));
        assert!(!m.is_match("HTTP/1.0 200 OK\r\n\r\nworkercheck"));
        assert!(!m.is_match(""));
    }

    #[test]
    fn decode_replaces_invalid_bytes() {
        let mut bytes = b"HTTP/1.1 200 OK\r\n\r\nworkercheck ".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let text = decode_response(&bytes);
        assert!(text.contains('\u{FFFD}'));
        assert!(matcher().is_match(&text));
    }
}
