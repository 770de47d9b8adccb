//! Worker pool (spec.md §4.8): a fixed set of workers draining a hand-off
//! queue fed by the acceptor, with a shared active-worker counter for
//! saturation logging.
//!
//! Grounded on the teacher's `ServerBuilder::build`, which pre-spawns
//! `max_connections` long-lived tokio tasks each looping on
//! `crossbeam::queue::SegQueue::pop`. The teacher additionally spawns
//! dedicated "alarmist" tasks to drain an overflow queue and answer 503;
//! this crate instead lets the hand-off queue grow unbounded and logs a
//! saturation warning (spec.md §5 "if the queue itself is unbounded...the
//! trade-off is documented"), since the spec's contract is "no dropped
//! accepts in steady state", not "shed load past N pending".

use crate::config::{Authority, ServerConfig};
use crate::server::connection;
use crossbeam::queue::SegQueue;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{info, warn};

pub(crate) type HandoffItem = (TcpStream, SocketAddr);
pub(crate) type HandoffQueue = Arc<SegQueue<HandoffItem>>;

/// Drives `workerCount` long-lived workers against a shared queue. Matches
/// the spec's "mutex-guarded integer" active counter with an `AtomicUsize`
/// — the counter only needs fetch-add/fetch-sub, which a mutex would
/// serialize no more correctly and considerably more slowly.
pub(crate) struct WorkerPool {
    queue: HandoffQueue,
    active: Arc<AtomicUsize>,
    worker_count: usize,
}

impl WorkerPool {
    pub(crate) fn new(worker_count: usize) -> Self {
        WorkerPool {
            queue: Arc::new(SegQueue::new()),
            active: Arc::new(AtomicUsize::new(0)),
            worker_count,
        }
    }

    pub(crate) fn queue(&self) -> HandoffQueue {
        Arc::clone(&self.queue)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Spawns the fixed worker set. Each worker polls the queue, and for
    /// every connection it picks up: increments `active`, drives the
    /// connection to completion, decrements `active`. The connection
    /// driver itself traps a handler panic around the single request it
    /// came from (emitting a 500 before closing, per spec.md §4.8/§9)
    /// rather than letting it unwind here — handing the live socket to a
    /// *second* spawned task that could panic and drop it without ever
    /// writing a response would defeat that guarantee, so `drive` is
    /// awaited directly on the worker's own task.
    pub(crate) fn spawn(&self, config: Arc<ServerConfig>, authority: Arc<Authority>) {
        for worker_id in 0..self.worker_count {
            let queue = Arc::clone(&self.queue);
            let active = Arc::clone(&self.active);
            let config = Arc::clone(&config);
            let authority = Arc::clone(&authority);

            tokio::spawn(async move {
                loop {
                    let Some((stream, peer)) = queue.pop() else {
                        tokio::time::sleep(Duration::from_micros(50)).await;
                        continue;
                    };

                    active.fetch_add(1, Ordering::AcqRel);
                    connection::drive(
                        stream,
                        peer,
                        worker_id,
                        Arc::clone(&config),
                        Arc::clone(&authority),
                    )
                    .await;
                    active.fetch_sub(1, Ordering::AcqRel);
                }
            });
        }
    }

    /// Logs `active/total` on a fixed interval, per spec.md §6's "pool:
    /// saturation warning; periodic status (active/total)".
    pub(crate) fn spawn_status_reporter(&self, interval: Duration) {
        let active = Arc::clone(&self.active);
        let worker_count = self.worker_count;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                info!(
                    active = active.load(Ordering::Relaxed),
                    total = worker_count,
                    "pool status"
                );
            }
        });
    }
}

/// Samples `active` and logs a saturation warning, per spec.md §4.8 ("the
/// acceptor samples `active` before enqueueing"). Called by the acceptor
/// once per accepted connection.
pub(crate) fn warn_if_saturated(pool: &WorkerPool) {
    let active = pool.active_count();
    if active >= pool.worker_count() {
        warn!(active, total = pool.worker_count(), "pool saturated, queuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_warning_triggers_at_or_above_worker_count() {
        let pool = WorkerPool::new(2);
        assert_eq!(pool.active_count(), 0);
        pool.active.fetch_add(2, Ordering::AcqRel);
        // warn_if_saturated only logs; this just exercises the threshold
        // logic without panicking when active == worker_count.
        warn_if_saturated(&pool);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn queue_handle_is_shared_across_clones() {
        let pool = WorkerPool::new(1);
        let queue_a = pool.queue();
        let queue_b = pool.queue();
        assert!(queue_a.is_empty());
        assert!(queue_b.is_empty());
    }
}
