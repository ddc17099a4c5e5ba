//! Auction Clock
//!
//! Bid staleness is a pure function of the time a bid was placed and the
//! time a withdrawal is attempted. Wall-clock time comes from a [`Clock`]
//! so tests can drive it by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use lib_types::Timestamp;

/// Source of the current time in unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Decides when a bid may be withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionClock {
    stale_window_secs: u64,
}

impl AuctionClock {
    pub fn new(stale_window_secs: u64) -> Self {
        Self { stale_window_secs }
    }

    pub fn stale_window_secs(&self) -> u64 {
        self.stale_window_secs
    }

    /// First instant at which a bid placed at `placed_at` is stale
    pub fn stale_at(&self, placed_at: Timestamp) -> Timestamp {
        placed_at.saturating_add(self.stale_window_secs)
    }

    pub fn is_stale(&self, placed_at: Timestamp, now: Timestamp) -> bool {
        now.saturating_sub(placed_at) >= self.stale_window_secs
    }
}
