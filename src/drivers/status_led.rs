use embassy_stm32::gpio::{AnyPin, Level as PinLevel, Output, Pin, Speed};

use crate::actuator::{Actuator, Level};

/// Indicator LED on a push-pull output.
pub struct StatusLed {
    pin: Output<'static, AnyPin>,
    active_low: bool,
}

impl StatusLed {
    /// Starts dark.
    pub fn new(pin: impl Pin, active_low: bool) -> Self {
        let idle = if active_low { PinLevel::High } else { PinLevel::Low };
        Self { pin: Output::new(pin.degrade(), idle, Speed::Low), active_low }
    }
}

impl Actuator for StatusLed {
    fn drive(&mut self, level: Level) {
        if level.is_on() != self.active_low {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
