//! Threaded worker-pool runner with a stall watchdog.

use std::panic;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError};
use halo_transport::{ChannelFabric, ChannelTransport};

/// Watchdog budget used by [`run_pool`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Run `worker` once per rank of a `pool_size` fabric, each on its own
/// thread, and return the results in rank order.
///
/// Panics if any worker panics (re-raising the first payload) or if the
/// pool has not finished within [`DEFAULT_TIMEOUT`], which is how a
/// deadlocked exchange shows up in tests.
pub fn run_pool<R, F>(pool_size: usize, worker: F) -> Vec<R>
where
    R: Send + 'static,
    F: Fn(ChannelTransport) -> R + Send + Clone + 'static,
{
    run_pool_with_timeout(pool_size, DEFAULT_TIMEOUT, worker)
}

/// [`run_pool`] with an explicit watchdog budget.
pub fn run_pool_with_timeout<R, F>(pool_size: usize, timeout: Duration, worker: F) -> Vec<R>
where
    R: Send + 'static,
    F: Fn(ChannelTransport) -> R + Send + Clone + 'static,
{
    tracing::debug!(pool_size, ?timeout, "starting worker pool");
    let (tx, rx) = unbounded();
    let handles: Vec<_> = ChannelFabric::build(pool_size)
        .into_iter()
        .enumerate()
        .map(|(rank, transport)| {
            let tx = tx.clone();
            let worker = worker.clone();
            thread::Builder::new()
                .name(format!("halo-worker-{rank}"))
                .spawn(move || {
                    let out = worker(transport);
                    let _ = tx.send((rank, out));
                })
                .unwrap_or_else(|e| panic!("failed to spawn worker {rank}: {e}"))
        })
        .collect();
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut results: Vec<Option<R>> = (0..pool_size).map(|_| None).collect();
    let mut received = 0;
    while received < pool_size {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok((rank, out)) => {
                results[rank] = Some(out);
                received += 1;
            }
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                let missing: Vec<usize> = (0..pool_size).filter(|&r| results[r].is_none()).collect();
                panic!("worker pool stalled after {timeout:?}; ranks {missing:?} never finished");
            }
        }
    }

    for handle in handles {
        if let Err(payload) = handle.join() {
            panic::resume_unwind(payload);
        }
    }
    results
        .into_iter()
        .enumerate()
        .map(|(rank, r)| r.unwrap_or_else(|| panic!("worker {rank} produced no result")))
        .collect()
}
