//! Conversion-done notification between interrupt and task context.
//!
//! The completion callback is the only writer, the acquisition task the only
//! reader. Taking the value clears it, so a `done` flag can never be observed
//! without its matching `last_offset`.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::config::GroupId;

/// What the completion callback hands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GroupCompletion {
    pub group: GroupId,
    /// Inclusive index of the last valid result
    pub last_offset: usize,
}

pub struct CompletionSignal {
    signal: Signal<CriticalSectionRawMutex, GroupCompletion>,
    raised: AtomicU32,
}

impl CompletionSignal {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            raised: AtomicU32::new(0),
        }
    }

    /// Interrupt-context side. Never blocks; an unconsumed completion is
    /// replaced.
    pub fn complete(&self, info: GroupCompletion) {
        self.raised.fetch_add(1, Ordering::Relaxed);
        self.signal.signal(info);
    }

    /// Suspend until the next completion and consume it.
    pub async fn wait(&self) -> GroupCompletion {
        self.signal.wait().await
    }

    pub fn try_take(&self) -> Option<GroupCompletion> {
        self.signal.try_take()
    }

    /// Drop a completion left over from a previous period.
    pub fn clear(&self) {
        self.signal.reset();
    }

    /// Completions raised since boot.
    pub fn raised(&self) -> u32 {
        self.raised.load(Ordering::Relaxed)
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}
