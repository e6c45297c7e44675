use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::peripherals::{EXTI0, PA0};

use crate::drivers::adc::DriverError;
use crate::tasks::button::EdgeSource;

/// Push button on PA0, pulled down, pressed = high.
pub struct ExtiButton {
    input: ExtiInput<'static, PA0>,
}

impl ExtiButton {
    pub fn new(pin: PA0, line: EXTI0) -> Self {
        Self { input: ExtiInput::new(Input::new(pin, Pull::Down), line) }
    }
}

impl EdgeSource for ExtiButton {
    fn enable(&mut self) -> Result<(), DriverError> {
        // Held at power-up: the next rising edge still arrives after release.
        if self.input.is_high() {
            log_warn!("button: pressed while arming");
        }
        Ok(())
    }

    async fn wait_for_edge(&mut self) {
        self.input.wait_for_rising_edge().await;
    }

    fn clear_pending(&mut self) {
        // The EXTI driver clears the pending bit when the edge future resolves.
    }
}
