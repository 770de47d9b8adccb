//! The response encoder (spec.md §4.4): status + headers + body bytes, with
//! the mandatory server headers always present.
//!
//! Grounded on the teacher's `Response` builder (`status` / `header` /
//! `close` / buffer-backed emission), simplified from its zero-copy
//! `WriteBuffer`-generic builder down to a plain owned `Vec<u8>` builder —
//! there is exactly one response shape in this crate (buffer-then-send),
//! not a library surface other crates build emission strategies on top of.

use crate::http::types::StatusCode;

/// A status line + headers + body, ready to be written to the wire.
///
/// The status line always advertises HTTP/1.1 regardless of the request's
/// version (spec.md §4.4), so `Response` carries no version of its own.
pub(crate) struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(status: StatusCode) -> Self {
        Response {
            status,
            headers: Vec::with_capacity(8),
            body: Vec::new(),
        }
    }

    pub(crate) fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Encodes the response, filling in `Date`, `Server`, `Content-Length`
    /// and `Connection` if the handler did not already set them, per
    /// spec.md §3's invariant that every response carries all four.
    pub(crate) fn encode(mut self, date: &str, keep_alive: bool) -> Vec<u8> {
        if !self.has_header("date") {
            self = self.header("Date", date);
        }
        if !self.has_header("server") {
            self = self.header("Server", "Multi-threaded HTTP Server");
        }
        if !self.has_header("content-length") {
            let len = self.body.len();
            self = self.header("Content-Length", len.to_string());
        }
        if !self.has_header("connection") {
            let connection = if keep_alive { "keep-alive" } else { "close" };
            self = self.header("Connection", connection);
            if keep_alive {
                self = self.header("Keep-Alive", "timeout=30, max=100");
            }
        }

        let mut out = Vec::with_capacity(256 + self.body.len());
        out.extend_from_slice(self.status.into_first_line());
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_offset(encoded: &[u8]) -> usize {
        let marker = b"\r\n\r\n";
        encoded
            .windows(marker.len())
            .position(|w| w == marker)
            .expect("blank line present")
            + marker.len()
    }

    #[test]
    fn mandatory_headers_are_always_present() {
        let encoded = Response::new(StatusCode::Ok)
            .body(b"hello".to_vec())
            .encode("Sun, 06 Nov 1994 08:49:37 GMT", true);
        let head = String::from_utf8(encoded[..body_offset(&encoded)].to_vec()).unwrap();
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n"));
        assert!(head.contains("Server: Multi-threaded HTTP Server\r\n"));
        assert!(head.contains("Content-Length: 5\r\n"));
        assert!(head.contains("Connection: keep-alive\r\n"));
        assert!(head.contains("Keep-Alive: timeout=30, max=100\r\n"));
    }

    #[test]
    fn content_length_matches_body_byte_count() {
        let body = vec![0u8; 1024];
        let encoded = Response::new(StatusCode::Ok)
            .body(body.clone())
            .encode("x", false);
        let offset = body_offset(&encoded);
        assert_eq!(encoded.len() - offset, body.len());
    }

    #[test]
    fn close_connection_omits_keep_alive_header() {
        let encoded = Response::new(StatusCode::NotFound).encode("x", false);
        let head = String::from_utf8(encoded[..body_offset(&encoded)].to_vec()).unwrap();
        assert!(head.contains("Connection: close\r\n"));
        assert!(!head.contains("Keep-Alive"));
    }
}
