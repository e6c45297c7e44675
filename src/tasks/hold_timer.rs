//! One-shot hold timer for the status LED.
//!
//! The button interrupt re-arms it; the service task turns the LED off once
//! the full period has passed without another re-arm. Expiry is handled in
//! task context, never by the interrupt handler.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer};

use crate::actuator::{Actuator, Level, SharedActuator};

/// Countdown state, kept separate from the clock so it can be stepped by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    #[default]
    Idle,
    Armed { deadline: Instant },
}

impl HoldState {
    /// Starts a full period from `now`, whether or not it was already armed.
    pub fn arm(&mut self, now: Instant, period: Duration) {
        *self = HoldState::Armed { deadline: now + period };
    }

    /// `true` exactly once per arm, at or after the deadline.
    pub fn expire(&mut self, now: Instant) -> bool {
        match *self {
            HoldState::Armed { deadline } if now >= deadline => {
                *self = HoldState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match *self {
            HoldState::Idle => None,
            HoldState::Armed { deadline } => Some(deadline),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    /// The reset unblocked the timer service, so the caller should yield.
    pub higher_priority_woken: bool,
}

pub struct HoldTimer {
    period: Duration,
    rearm: Signal<CriticalSectionRawMutex, Instant>,
    armed: AtomicBool,
    expirations: AtomicU32,
}

impl HoldTimer {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            rearm: Signal::new(),
            armed: AtomicBool::new(false),
            expirations: AtomicU32::new(0),
        }
    }

    /// Interrupt-safe; never blocks. The countdown restarts from the time
    /// of this call.
    pub fn reset_from_isr(&self) -> ResetOutcome {
        let pending = self.rearm.signaled();
        self.armed.store(true, Ordering::Release);
        self.rearm.signal(Instant::now());
        ResetOutcome { higher_priority_woken: !pending }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn expirations(&self) -> u32 {
        self.expirations.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Timer service. Drives `led` off on every expiry; never returns.
    pub async fn service<A: Actuator>(&self, led: &SharedActuator<A>) -> Infallible {
        let mut state = HoldState::Idle;
        loop {
            let Some(deadline) = state.deadline() else {
                let at = self.rearm.wait().await;
                state.arm(at, self.period);
                continue;
            };

            match select(Timer::at(deadline), self.rearm.wait()).await {
                Either::First(()) => {
                    // Both sides ready after a late poll: the pending rearm wins.
                    if let Some(at) = self.rearm.try_take() {
                        self.armed.store(true, Ordering::Release);
                        state.arm(at, self.period);
                        continue;
                    }
                    if state.expire(Instant::now()) {
                        self.armed.store(false, Ordering::Release);
                        led.set(Level::Off);
                        let n = self.expirations.fetch_add(1, Ordering::Relaxed) + 1;
                        log_debug!("hold timer: expired ({})", n);
                    }
                }
                Either::Second(at) => {
                    self.armed.store(true, Ordering::Release);
                    state.arm(at, self.period);
                }
            }
        }
    }
}
