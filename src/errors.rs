use crate::http::types::StatusCode;
use std::{error, fmt, io};

/// Classified failure produced by the parser, a guard, or a handler.
///
/// The connection driver is the single place that turns one of these into a
/// wire response (`status` + `json_body`, run through the same
/// [`Response`](crate::http::response::Response) encoder every success path
/// uses) and a close decision (`closes_connection`). Routing errors through
/// the ordinary encoder, rather than writing out full pre-baked responses
/// per variant the way the teacher's `http_errors!` did, is what lets an
/// error response carry the mandatory `Date`/`Server`/`Keep-Alive` headers
/// spec.md §3 requires of every response, error or not.
#[derive(Debug)]
pub(crate) enum ErrorKind {
    Malformed,
    TooLarge,
    UnsupportedVersion,

    MissingHost,
    HostMismatch(String),

    Forbidden(String),
    NotFound,

    UnsupportedMedia,
    MethodNotAllowed,

    BadUpload,
    Internal,
    Io(IoError),
}

macro_rules! json_bodies {
    ($($name:ident: $json:literal; )*) => {
        pub(crate) const fn json_body(&self) -> &'static str {
            match self { $(
                ErrorKind::$name { .. } => $json,
            )* }
        }
    };
}

impl ErrorKind {
    json_bodies! {
        Malformed: r#"{"error":"Malformed request","code":"MALFORMED"}"#;
        TooLarge: r#"{"error":"Request too large","code":"TOO_LARGE"}"#;
        UnsupportedVersion: r#"{"error":"HTTP version not supported","code":"UNSUPPORTED_VERSION"}"#;

        MissingHost: r#"{"error":"Missing Host header","code":"MISSING_HOST"}"#;
        HostMismatch: r#"{"error":"Host not recognized","code":"HOST_MISMATCH"}"#;

        Forbidden: r#"{"error":"Forbidden","code":"FORBIDDEN"}"#;
        NotFound: r#"{"error":"Not found","code":"NOT_FOUND"}"#;

        UnsupportedMedia: r#"{"error":"Unsupported media type","code":"UNSUPPORTED_MEDIA"}"#;
        MethodNotAllowed: r#"{"error":"Method not allowed","code":"METHOD_NOT_ALLOWED"}"#;

        BadUpload: r#"{"error":"Invalid JSON body","code":"BAD_UPLOAD"}"#;
        Internal: r#"{"error":"Internal server error","code":"INTERNAL"}"#;
        Io: r#"{"error":"I/O error","code":"IO_ERROR"}"#;
    }

    pub(crate) const fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Malformed | ErrorKind::MissingHost | ErrorKind::BadUpload => {
                StatusCode::BadRequest
            }
            ErrorKind::TooLarge => StatusCode::PayloadTooLarge,
            ErrorKind::UnsupportedVersion => StatusCode::HttpVersionNotSupported,
            ErrorKind::Forbidden(_) | ErrorKind::HostMismatch(_) => StatusCode::Forbidden,
            ErrorKind::NotFound => StatusCode::NotFound,
            ErrorKind::MethodNotAllowed => StatusCode::MethodNotAllowed,
            ErrorKind::UnsupportedMedia => StatusCode::UnsupportedMediaType,
            ErrorKind::Internal | ErrorKind::Io(_) => StatusCode::InternalServerError,
        }
    }

    /// Whether the connection must close after this error is sent, per the
    /// table in spec.md §7.
    pub(crate) const fn closes_connection(&self) -> bool {
        !matches!(
            self,
            ErrorKind::NotFound | ErrorKind::MethodNotAllowed | ErrorKind::UnsupportedMedia
        )
    }

    /// Security-log line for the two gates that must log before they reject.
    /// `None` for errors that are not security events.
    pub(crate) fn security_event(&self) -> Option<String> {
        match self {
            ErrorKind::Forbidden(target) => Some(format!("Path traversal attempt - {target}")),
            ErrorKind::HostMismatch(observed) => Some(format!("Host mismatch - {observed}")),
            ErrorKind::MissingHost => Some("Missing Host header".to_string()),
            _ => None,
        }
    }
}

impl error::Error for ErrorKind {}
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Malformed => write!(f, "malformed request"),
            ErrorKind::TooLarge => write!(f, "request exceeds byte cap"),
            ErrorKind::UnsupportedVersion => write!(f, "unsupported HTTP version"),
            ErrorKind::MissingHost => write!(f, "missing Host header"),
            ErrorKind::HostMismatch(observed) => write!(f, "Host mismatch: {observed}"),
            ErrorKind::Forbidden(target) => write!(f, "forbidden: {target}"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::UnsupportedMedia => write!(f, "unsupported media type"),
            ErrorKind::MethodNotAllowed => write!(f, "method not allowed"),
            ErrorKind::BadUpload => write!(f, "invalid upload body"),
            ErrorKind::Internal => write!(f, "internal error"),
            ErrorKind::Io(e) => write!(f, "io error: {}", e.0),
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        ErrorKind::Io(IoError(err))
    }
}

#[derive(Debug)]
pub(crate) struct IoError(pub(crate) io::Error);
