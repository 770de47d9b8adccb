//! Stand-alone HTTP/1.1 origin server: static asset serving, JSON uploads,
//! path-traversal and Host-header gates, a bounded worker pool with
//! keep-alive (spec.md §§1-9).
//!
//! Grounded on the teacher's `maker_web` crate, restructured from a
//! reusable `Handler<S>` library around one concrete route table. The CLI
//! surface (`<port> [<host> [<workers>]]`) and the `tracing_subscriber`
//! bring-up are grounded on the `chat`/`apex` examples in the pack, whose
//! `main.rs` wires a `registry().with(EnvFilter).with(fmt::layer()).init()`
//! stack the same way (SPEC_FULL.md §10.7).

mod clock;
mod config;
mod errors;
mod guards;
mod handlers;
mod http;
mod server;
mod storage;

use config::ServerConfig;
use server::pool::WorkerPool;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_WORKERS: usize = 10;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "origin_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S".to_string(),
                )),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (port, host, workers) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: origin_http [port] [host] [workers]");
            return ExitCode::FAILURE;
        }
    };

    let config = Arc::new(ServerConfig::new(host, port, workers));
    let authority = Arc::new(config.authority());

    let addr: SocketAddr = match format!("{}:{}", config.bind_host, config.bind_port).parse() {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(%err, "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match server::acceptor::bind(addr, config.listen_backlog) {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, %addr, "failed to bind listening socket");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        %addr,
        workers = config.worker_count,
        document_root = %config.document_root.display(),
        "origin_http listening"
    );

    let pool = WorkerPool::new(config.worker_count);
    pool.spawn(Arc::clone(&config), Arc::clone(&authority));
    pool.spawn_status_reporter(std::time::Duration::from_secs(30));

    let queue = pool.queue();
    server::acceptor::run(listener, queue, &pool, shutdown_signal()).await;

    ExitCode::SUCCESS
}

/// Waits for Ctrl-C (or SIGTERM on Unix) so the acceptor can stop cleanly
/// and let in-flight connections drain, per spec.md §6 "Exit 0 on graceful
/// shutdown".
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Parses the positional `<port> [<host> [<workers>]]` CLI surface
/// (spec.md §6), falling back to the documented defaults for any argument
/// left unspecified.
fn parse_args(args: &[String]) -> Result<(u16, String, usize), String> {
    let port = match args.first() {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| format!("invalid port: {raw}"))?,
        None => DEFAULT_PORT,
    };
    let host = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let workers = match args.get(2) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("invalid worker count: {raw}"))?,
        None => DEFAULT_WORKERS,
    };
    if workers == 0 {
        return Err("worker count must be at least 1".to_string());
    }

    Ok((port, host, workers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_uses_documented_defaults() {
        let (port, host, workers) = parse_args(&[]).unwrap();
        assert_eq!(port, DEFAULT_PORT);
        assert_eq!(host, DEFAULT_HOST);
        assert_eq!(workers, DEFAULT_WORKERS);
    }

    #[test]
    fn all_three_args_are_honored() {
        let args = vec!["9090".to_string(), "0.0.0.0".to_string(), "4".to_string()];
        let (port, host, workers) = parse_args(&args).unwrap();
        assert_eq!(port, 9090);
        assert_eq!(host, "0.0.0.0");
        assert_eq!(workers, 4);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let args = vec!["not-a-port".to_string()];
        assert!(parse_args(&args).is_err());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let args = vec!["8080".to_string(), "127.0.0.1".to_string(), "0".to_string()];
        assert!(parse_args(&args).is_err());
    }
}
