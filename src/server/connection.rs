//! Connection driver (spec.md §4.7): the per-connection state machine —
//! Reading -> Dispatching -> Writing -> (Reading | Closed).
//!
//! Grounded on the teacher's `HttpConnection::run`/`impl_run` loop and its
//! `tokio::select!`-based read/write timeouts, restructured around the
//! owned `Request`/`Response` types and the spec's concrete dispatch table
//! rather than the teacher's generic `Handler<S>` trait — this crate has
//! exactly one route table (GET/POST/405), not a pluggable one.

use crate::clock;
use crate::config::{Authority, ServerConfig};
use crate::errors::ErrorKind;
use crate::guards::{host_guard, path_guard};
use crate::handlers;
use crate::http::request::{self, ParseOutcome, Request};
use crate::http::response::Response;
use crate::http::types::Method;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{info, warn};

const READ_CHUNK: usize = 4096;

/// Drives one accepted connection to completion: repeated
/// read/parse/dispatch/write cycles until the peer disconnects, the idle
/// deadline elapses, the per-connection request cap is reached, or an
/// error forces close.
pub(crate) async fn drive(
    mut stream: TcpStream,
    peer: SocketAddr,
    worker_id: usize,
    config: Arc<ServerConfig>,
    authority: Arc<Authority>,
) {
    info!(worker_id, %peer, "connection opened");

    let mut buf: Vec<u8> = Vec::with_capacity(config.max_request_bytes);
    let mut request_count: usize = 0;

    loop {
        let request = match read_request(&mut stream, &mut buf, &config).await {
            ReadOutcome::Request(request) => request,
            ReadOutcome::Closed => break,
            ReadOutcome::ParseError(err) => {
                let bytes = Response::new(err.status())
                    .header("Content-Type", "application/json")
                    .body(err.json_body().as_bytes().to_vec())
                    .encode(&clock::http_date(), false);
                let _ = write_all(&mut stream, &bytes, config.idle_timeout).await;
                break;
            }
        };

        request_count += 1;
        info!(
            worker_id,
            %peer,
            method = request.method.as_str(),
            target = %request.target,
            "request"
        );

        let host_outcome = host_guard::check(&request.headers, &authority);
        info!(worker_id, %peer, valid = host_outcome.is_ok(), "host validation");

        let at_cap = request_count >= config.max_requests_per_connection;
        let dispatch_result = match host_outcome {
            Ok(()) => dispatch_guarded(request.clone(), Arc::clone(&config), worker_id, peer).await,
            Err(err) => Err(err),
        };
        let (response, force_close) = match dispatch_result {
            Ok(response) => (response, false),
            Err(err) => {
                if let Some(event) = err.security_event() {
                    warn!(worker_id, %peer, "{event}");
                }
                let mut response = Response::new(err.status())
                    .header("Content-Type", "application/json")
                    .body(err.json_body().as_bytes().to_vec());
                if matches!(err, ErrorKind::MethodNotAllowed) {
                    response = response.header("Allow", "GET, POST");
                }
                (response, err.closes_connection())
            }
        };

        let keep_alive = !force_close && !at_cap && wants_keep_alive(&request);
        let date = clock::http_date();
        let status = response.status_code();
        let bytes = response.encode(&date, keep_alive);
        info!(worker_id, %peer, status = status.as_u16(), bytes = bytes.len(), "response");

        if write_all(&mut stream, &bytes, config.idle_timeout).await.is_err() {
            warn!(worker_id, %peer, "write error");
            break;
        }

        if !keep_alive {
            break;
        }
    }

    info!(worker_id, %peer, requests = request_count, "connection closed");
}

enum ReadOutcome {
    Request(Request),
    /// Idle timeout, EOF, or a read error — close with no response.
    Closed,
    /// The accumulated bytes failed to parse into a request.
    ParseError(ErrorKind),
}

/// Reads and accumulates bytes until one full request is parsed, the idle
/// deadline elapses, or the peer disconnects. Leftover bytes past the
/// parsed request (a pipelined next request already on the wire) are kept
/// in `buf` for the following iteration.
async fn read_request(
    stream: &mut TcpStream,
    buf: &mut Vec<u8>,
    config: &ServerConfig,
) -> ReadOutcome {
    loop {
        match request::parse(buf, config.max_request_bytes) {
            Ok(ParseOutcome::Complete { request, consumed }) => {
                buf.drain(..consumed);
                return ReadOutcome::Request(request);
            }
            Ok(ParseOutcome::Incomplete) => {}
            Err(err) => return ReadOutcome::ParseError(err),
        }

        let mut chunk = [0u8; READ_CHUNK];
        let read = timeout(config.idle_timeout, stream.read(&mut chunk)).await;
        match read {
            Ok(Ok(0)) => return ReadOutcome::Closed,
            Ok(Ok(n)) => buf.extend_from_slice(&chunk[..n]),
            Ok(Err(_)) => return ReadOutcome::Closed,
            Err(_) => return ReadOutcome::Closed,
        }
    }
}

async fn write_all(
    stream: &mut TcpStream,
    bytes: &[u8],
    deadline: Duration,
) -> std::io::Result<()> {
    match timeout(deadline, stream.write_all(bytes)).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "write timed out",
        )),
    }
}

/// Runs `route` inside its own task and converts a handler panic into
/// `ErrorKind::Internal` instead of letting it unwind into the caller.
///
/// `drive` still owns `stream` at this point, so the resulting `Err` flows
/// through the ordinary error-response path below and a 500 is written and
/// the connection closed before the socket is ever dropped — spec.md §4.8
/// ("the worker catches, logs a 500, closes the connection") and §9 ("emit
/// a 500 if the response has not started"). A bare `tokio::spawn` already
/// isolates the panic to this task; `AssertUnwindSafe`/`catch_unwind` is
/// unnecessary on top of that isolation.
async fn dispatch_guarded(
    request: Request,
    config: Arc<ServerConfig>,
    worker_id: usize,
    peer: SocketAddr,
) -> Result<Response, ErrorKind> {
    match tokio::spawn(async move { route(&request, &config).await }).await {
        Ok(result) => result,
        Err(panic) => {
            warn!(worker_id, %peer, %panic, "handler panicked");
            Err(ErrorKind::Internal)
        }
    }
}

/// Per-method dispatch, run once the host guard has already passed
/// (spec.md §4.7 Dispatching state).
async fn route(request: &Request, config: &ServerConfig) -> Result<Response, ErrorKind> {
    match request.method {
        Method::Get => {
            let resolved = path_guard::resolve(&request.target, &config.document_root)?;
            handlers::get::handle(&resolved).await
        }
        Method::Post => {
            handlers::post::handle(request.headers.get("content-type"), &request.body, config)
                .await
        }
        _ => Err(ErrorKind::MethodNotAllowed),
    }
}

/// spec.md §4.7: `Connection: close` absent defaults to keep-alive on
/// HTTP/1.1; `Connection: keep-alive` present is required to opt in on
/// HTTP/1.0 and older.
fn wants_keep_alive(request: &Request) -> bool {
    match request.headers.get("connection") {
        Some(value) if value.eq_ignore_ascii_case("close") => false,
        Some(value) if value.eq_ignore_ascii_case("keep-alive") => true,
        _ => request.version.keeps_alive_by_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::types::{HeaderMap, Version};

    fn request_with(version: Version, connection: Option<&str>) -> Request {
        let mut headers = HeaderMap::new();
        if let Some(value) = connection {
            headers.insert("Connection".to_string(), value.to_string());
        }
        Request {
            method: Method::Get,
            target: "/".to_string(),
            version,
            headers,
            body: Vec::new(),
        }
    }

    #[test]
    fn http11_defaults_to_keep_alive() {
        assert!(wants_keep_alive(&request_with(Version::Http11, None)));
    }

    #[test]
    fn http11_honors_explicit_close() {
        assert!(!wants_keep_alive(&request_with(
            Version::Http11,
            Some("close")
        )));
    }

    #[test]
    fn http10_defaults_to_close() {
        assert!(!wants_keep_alive(&request_with(Version::Http10, None)));
    }

    #[test]
    fn http10_honors_explicit_keep_alive() {
        assert!(wants_keep_alive(&request_with(
            Version::Http10,
            Some("keep-alive")
        )));
    }
}
