//! Acceptor (spec.md §4.9): owns the listening socket, accepts connections,
//! hands them to the worker pool, reports saturation, and stops cleanly on
//! shutdown.
//!
//! Grounded on the teacher's `Server::launch` accept loop. `socket2` wires
//! up `SO_REUSEADDR`/`TCP_NODELAY` — declared in the teacher's `Cargo.toml`
//! but never called from its `src/` (SPEC_FULL.md §10.8).

use crate::server::pool::{HandoffQueue, WorkerPool};
use socket2::{Domain, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Binds the listening socket with `SO_REUSEADDR` set (so a restarted
/// server doesn't fail to bind while the previous process's sockets drain
/// through `TIME_WAIT`) and the configured backlog.
pub(crate) fn bind(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog as i32)?;
    TcpListener::from_std(socket.into())
}

/// Accepts connections until `shutdown` resolves, pushing each onto
/// `queue` and logging a saturation warning when the pool is fully busy.
/// Exits cleanly (letting in-flight workers drain on their own) once the
/// shutdown signal fires — spec.md §4.9, §6 "Exit 0 on graceful shutdown".
pub(crate) async fn run(
    listener: TcpListener,
    queue: HandoffQueue,
    pool: &WorkerPool,
    shutdown: impl std::future::Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        if let Err(err) = configure_accepted_socket(&stream) {
                            warn!(%peer, %err, "failed to configure accepted socket");
                        }
                        crate::server::pool::warn_if_saturated(pool);
                        queue.push((stream, peer));
                    }
                    Err(err) => {
                        warn!(%err, "accept failed");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }
}

fn configure_accepted_socket(stream: &tokio::net::TcpStream) -> io::Result<()> {
    stream.set_nodelay(true)
}
