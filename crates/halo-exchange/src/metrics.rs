//! Per-exchange performance metrics.
//!
//! [`ExchangeMetrics`] captures timing and traffic counters for a single
//! [`HaloExchanger::exchange`](crate::HaloExchanger::exchange) call.

use std::time::Duration;

/// Timing and traffic collected during one exchange call.
///
/// All durations are in microseconds. Traffic counts values (`f64`s),
/// not bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeMetrics {
    /// Wall-clock time for the whole call, in microseconds.
    pub total_us: u64,
    /// Time spent copying boundary data to and from transfer buffers,
    /// in microseconds.
    pub pack_us: u64,
    /// Time blocked in the transport, in microseconds.
    pub wait_us: u64,
    /// Messages sent to neighbors.
    pub messages_sent: u32,
    /// Messages received from neighbors.
    pub messages_received: u32,
    /// Values sent to neighbors.
    pub values_sent: u64,
    /// Values received from neighbors.
    pub values_received: u64,
    /// Cumulative number of completed exchanges, this one included.
    pub exchanges: u64,
}

/// Running totals for an exchange in progress.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub pack: Duration,
    pub wait: Duration,
    pub messages_sent: u32,
    pub messages_received: u32,
    pub values_sent: u64,
    pub values_received: u64,
}

impl Tally {
    pub fn sent(&mut self, values: usize) {
        self.messages_sent += 1;
        self.values_sent += values as u64;
    }

    pub fn received(&mut self, values: usize) {
        self.messages_received += 1;
        self.values_received += values as u64;
    }

    pub fn finish(self, total: Duration, exchanges: u64) -> ExchangeMetrics {
        ExchangeMetrics {
            total_us: micros(total),
            pack_us: micros(self.pack),
            wait_us: micros(self.wait),
            messages_sent: self.messages_sent,
            messages_received: self.messages_received,
            values_sent: self.values_sent,
            values_received: self.values_received,
            exchanges,
        }
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
