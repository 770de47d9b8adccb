//! Host guard (spec.md §4.2): validates the `Host` header against the
//! server's bound [`Authority`](crate::config::Authority).

use crate::config::Authority;
use crate::errors::ErrorKind;
use crate::http::types::HeaderMap;

/// Looks up and validates the `Host` header. Trailing whitespace around
/// the header value is already trimmed by the wire parser; the comparison
/// itself is case-sensitive on the host literal, per spec.md §4.2.
pub(crate) fn check(headers: &HeaderMap, authority: &Authority) -> Result<(), ErrorKind> {
    let observed = headers.get("host").ok_or(ErrorKind::MissingHost)?;
    if authority.allows(observed) {
        Ok(())
    } else {
        Err(ErrorKind::HostMismatch(observed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_host(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Host".to_string(), value.to_string());
        headers
    }

    #[test]
    fn missing_host_header_is_rejected() {
        let authority = Authority::new("127.0.0.1", 8080);
        let err = check(&HeaderMap::new(), &authority).unwrap_err();
        assert!(matches!(err, ErrorKind::MissingHost));
    }

    #[test]
    fn bound_host_and_port_is_accepted() {
        let authority = Authority::new("127.0.0.1", 8080);
        assert!(check(&headers_with_host("127.0.0.1:8080"), &authority).is_ok());
    }

    #[test]
    fn localhost_alias_is_accepted() {
        let authority = Authority::new("127.0.0.1", 8080);
        assert!(check(&headers_with_host("localhost:8080"), &authority).is_ok());
        assert!(check(&headers_with_host("localhost"), &authority).is_ok());
    }

    #[test]
    fn unrecognized_host_is_rejected() {
        let authority = Authority::new("127.0.0.1", 8080);
        let err = check(&headers_with_host("evil.com"), &authority).unwrap_err();
        assert!(matches!(err, ErrorKind::HostMismatch(observed) if observed == "evil.com"));
    }
}
