//! Capacity-1 hand-off queues between producer and consumer tasks.
//!
//! Drop policy: when the slot is occupied, `try_publish` keeps the queued
//! item and discards the new one. The producer never waits.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_time::{with_timeout, Duration};

pub const QUEUE_DEPTH: usize = 1;

pub struct DistributionQueue<T> {
    chan: Channel<CriticalSectionRawMutex, T, QUEUE_DEPTH>,
    dropped: AtomicU32,
}

impl<T> DistributionQueue<T> {
    pub const fn new() -> Self {
        Self {
            chan: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Non-blocking send. Returns `false` when the item was dropped.
    pub fn try_publish(&self, item: T) -> bool {
        match self.chan.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Wait indefinitely for the next item.
    pub async fn receive(&self) -> T {
        self.chan.receive().await
    }

    /// `None` when nothing arrived within `timeout`.
    pub async fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        with_timeout(timeout, self.chan.receive()).await.ok()
    }

    pub fn try_receive(&self) -> Option<T> {
        self.chan.try_receive().ok()
    }

    pub fn is_full(&self) -> bool {
        self.chan.is_full()
    }

    /// Items discarded by `try_publish` since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Default for DistributionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
