//! Binary actuator shared by the button handler, the hold timer and the
//! command dispatcher.
//!
//! Writers are not ordered against each other: the last write wins.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Off,
    On,
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on {
            Level::On
        } else {
            Level::Off
        }
    }
}

impl Level {
    pub const fn is_on(self) -> bool {
        matches!(self, Level::On)
    }
}

/// Output line driver (pin, relay, ...).
pub trait Actuator {
    fn drive(&mut self, level: Level);
}

/// Interrupt-safe handle around one actuator line.
pub struct SharedActuator<A> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<A>>,
    on: AtomicBool,
    writes: AtomicU32,
}

impl<A> SharedActuator<A> {
    pub const fn new(actuator: A) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(actuator)),
            on: AtomicBool::new(false),
            writes: AtomicU32::new(0),
        }
    }

    /// Last level written.
    pub fn level(&self) -> Level {
        Level::from(self.on.load(Ordering::Acquire))
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Run `f` against the wrapped driver under the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&A) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }
}

impl<A: Actuator> SharedActuator<A> {
    pub fn set(&self, level: Level) {
        self.inner.lock(|cell| {
            cell.borrow_mut().drive(level);
            self.on.store(level.is_on(), Ordering::Release);
        });
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Actuator that only remembers what it was told; used on the host.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub level: Option<Level>,
    pub history: heapless::Vec<Level, 32>,
}

impl Actuator for RecordingActuator {
    fn drive(&mut self, level: Level) {
        self.level = Some(level);
        if self.history.is_full() {
            self.history.remove(0);
        }
        let _ = self.history.push(level);
    }
}
