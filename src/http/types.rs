#![allow(rustdoc::bare_urls)]

//! Core HTTP protocol types: method, version, status code and header map.
//!
//! Where the upstream design kept these as zero-copy views into a single
//! connection buffer, here every field is owned. The spec this crate
//! implements reads a bounded head into memory once per request and never
//! needs to outlive that buffer, so the extra allocations are the simpler
//! and still entirely adequate choice.

use crate::errors::ErrorKind;

// METHOD

/// HTTP request methods.
///
/// # Disabled methods
///
/// * `TRACE` - disabled for security reasons
/// * `CONNECT` - disabled because it is no longer needed
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Head,
    Patch,
    Delete,
    Options,
}

impl Method {
    #[inline(always)]
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

// VERSION

/// HTTP protocol version.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// HTTP/0.9 - request line only, no headers.
    Http09,
    /// HTTP/1.0 - [RFC 1945](https://tools.ietf.org/html/rfc1945)
    Http10,
    /// HTTP/1.1 - [RFC 7230](https://tools.ietf.org/html/rfc7230) and related
    Http11,
}

impl Version {
    #[inline(always)]
    pub(crate) const fn from_bytes(src: &[u8]) -> Result<Self, ErrorKind> {
        match src {
            b"HTTP/1.1" => Ok(Self::Http11),
            b"HTTP/1.0" => Ok(Self::Http10),
            _ => Err(ErrorKind::UnsupportedVersion),
        }
    }

    /// Default keep-alive policy when the request carries no `Connection`
    /// header: HTTP/1.1 defaults to persistent, everything older defaults
    /// to close.
    pub(crate) const fn keeps_alive_by_default(&self) -> bool {
        matches!(self, Version::Http11)
    }
}

// STATUS_CODE

macro_rules! set_status_codes {
    ($(
        $(#[$docs:meta])+
        $name:ident = ($num:expr, $str:expr);
    )+) => {
        /// HTTP status codes, per
        /// [RFC 9110](https://tools.ietf.org/html/rfc9110#section-15).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StatusCode { $(
            #[doc = concat!(stringify!($num), " ", $str)]
            $(#[$docs])+
            $name = $num,
        )+ }

        impl StatusCode {
            /// The first response line as bytes, e.g. `b"HTTP/1.1 200 OK\r\n"`.
            ///
            /// Always advertises HTTP/1.1, even when answering an HTTP/1.0
            /// request — spec.md §4.4 calls this out explicitly as an
            /// acceptable simplification rather than a bug to fix.
            #[inline]
            pub(crate) const fn into_first_line(&self) -> &'static [u8] {
                match self { $(
                    StatusCode::$name => {
                        concat!("HTTP/1.1 ", $num, " ", $str, "\r\n").as_bytes()
                    },
                )+ }
            }

            #[inline]
            pub(crate) const fn as_u16(&self) -> u16 {
                match self { $(
                    StatusCode::$name => $num,
                )+ }
            }
        }
    }
}

set_status_codes! {
    /// [[RFC9110, Section 15.3.1](https://datatracker.ietf.org/doc/html/rfc9110#section-15.3.1)]
    Ok = (200, "OK");
    /// [[RFC9110, Section 15.3.2](https://datatracker.ietf.org/doc/html/rfc9110#section-15.3.2)]
    Created = (201, "Created");

    /// [[RFC9110, Section 15.5.1](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.1)]
    BadRequest = (400, "Bad Request");
    /// [[RFC9110, Section 15.5.4](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.4)]
    Forbidden = (403, "Forbidden");
    /// [[RFC9110, Section 15.5.5](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.5)]
    NotFound = (404, "Not Found");
    /// [[RFC9110, Section 15.5.6](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.6)]
    MethodNotAllowed = (405, "Method Not Allowed");
    /// [[RFC9110, Section 15.5.14](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.14)]
    PayloadTooLarge = (413, "Payload Too Large");
    /// [[RFC9110, Section 15.5.16](https://datatracker.ietf.org/doc/html/rfc9110#section-15.5.16)]
    UnsupportedMediaType = (415, "Unsupported Media Type");

    /// [[RFC9110, Section 15.6.1](https://datatracker.ietf.org/doc/html/rfc9110#section-15.6.1)]
    InternalServerError = (500, "Internal Server Error");
    /// [[RFC9110, Section 15.6.6](https://datatracker.ietf.org/doc/html/rfc9110#section-15.6.6)]
    HttpVersionNotSupported = (505, "HTTP Version Not Supported");
}

// HEADER MAP

/// Case-folded, insertion-ordered header collection. Duplicate keys keep
/// the last value written, per spec.md §3's `Request` entry.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderMap {
    headers: Vec<Header>,
    pub(crate) content_length: Option<usize>,
}

impl HeaderMap {
    pub(crate) fn new() -> Self {
        Self {
            headers: Vec::with_capacity(8),
            content_length: None,
        }
    }

    pub(crate) fn insert(&mut self, name: String, value: String) {
        if name.eq_ignore_ascii_case("content-length") {
            self.content_length = value.trim().parse().ok();
        }
        match self.headers.iter_mut().find(|h| h.name == name) {
            Some(existing) => existing.value = value,
            None => self.headers.push(Header { name, value }),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    name: String,
    value: String,
}
