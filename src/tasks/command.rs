//! Heartbeat sender and command receiver.
//!
//! The sender alternates two payload codes every period. The receiver maps
//! them onto the status LED; anything else is recorded and otherwise ignored.

use core::convert::Infallible;

use embassy_time::{Duration, Ticker};

use crate::actuator::{Actuator, Level, SharedActuator};
use crate::queue::DistributionQueue;
use crate::state::CommandCode;

/// LED off
pub const PAYLOAD_A: CommandCode = 201;
/// LED on
pub const PAYLOAD_B: CommandCode = 200;

/// Yields A, B, A, B, ...
#[derive(Debug, Clone, Copy)]
pub struct PayloadToggle {
    next: CommandCode,
}

impl PayloadToggle {
    pub const fn new() -> Self {
        Self { next: PAYLOAD_A }
    }

    pub fn advance(&mut self) -> CommandCode {
        let code = self.next;
        self.next = if code == PAYLOAD_A { PAYLOAD_B } else { PAYLOAD_A };
        code
    }
}

impl Default for PayloadToggle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Off,
    On,
    Invalid(CommandCode),
}

pub fn decode(code: CommandCode) -> Command {
    match code {
        PAYLOAD_A => Command::Off,
        PAYLOAD_B => Command::On,
        other => Command::Invalid(other),
    }
}

/// Applies received codes to the LED and keeps the diagnostic state.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    invalid: bool,
    invalid_count: u32,
    last_invalid: Option<CommandCode>,
}

impl CommandDispatcher {
    pub const fn new() -> Self {
        Self { invalid: false, invalid_count: 0, last_invalid: None }
    }

    pub fn dispatch<A: Actuator>(&mut self, code: CommandCode, led: &SharedActuator<A>) -> Command {
        self.invalid = false;
        let cmd = decode(code);
        match cmd {
            Command::Off => led.set(Level::Off),
            Command::On => led.set(Level::On),
            Command::Invalid(code) => {
                self.invalid = true;
                self.invalid_count = self.invalid_count.wrapping_add(1);
                self.last_invalid = Some(code);
                log_warn!("command: invalid payload {}", code);
            }
        }
        cmd
    }

    /// Set while the latest received code was not a known payload.
    pub fn invalid_flag(&self) -> bool {
        self.invalid
    }

    pub fn invalid_count(&self) -> u32 {
        self.invalid_count
    }

    pub fn last_invalid(&self) -> Option<CommandCode> {
        self.last_invalid
    }
}

/// Heartbeat: one payload per period, dropped when the receiver lags.
pub async fn run_sender(queue: &DistributionQueue<CommandCode>, period: Duration) -> Infallible {
    let mut toggle = PayloadToggle::new();
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        let code = toggle.advance();
        if !queue.try_publish(code) {
            log_debug!("heartbeat: command queue full, dropped {}", code);
        }
    }
}

pub async fn run_receiver<A: Actuator>(
    queue: &DistributionQueue<CommandCode>,
    led: &SharedActuator<A>,
    dispatcher: &mut CommandDispatcher,
) -> Infallible {
    loop {
        let code = queue.receive().await;
        dispatcher.dispatch(code, led);
    }
}
