use core::convert::Infallible;

use embassy_futures::yield_now;

use crate::actuator::{Actuator, Level, SharedActuator};
use crate::drivers::adc::DriverError;
use crate::error::Fault;
use crate::tasks::hold_timer::HoldTimer;

/// Edge-triggered external input.
pub trait EdgeSource {
    /// Arm the interrupt line. Called once, before the first wait.
    fn enable(&mut self) -> Result<(), DriverError>;

    async fn wait_for_edge(&mut self);

    fn clear_pending(&mut self);
}

/// Button edge handler: LED on, hold timer re-armed.
pub struct ButtonIrq<'a, A> {
    led: &'a SharedActuator<A>,
    timer: &'a HoldTimer,
    edges: u32,
}

impl<'a, A: Actuator> ButtonIrq<'a, A> {
    pub fn new(led: &'a SharedActuator<A>, timer: &'a HoldTimer) -> Self {
        Self { led, timer, edges: 0 }
    }

    /// Handles one edge. Returns whether the caller has to yield.
    pub fn on_edge<E: EdgeSource>(&mut self, source: &mut E) -> bool {
        self.led.set(Level::On);
        let outcome = self.timer.reset_from_isr();
        source.clear_pending();
        self.edges = self.edges.wrapping_add(1);
        outcome.higher_priority_woken
    }

    pub fn edges(&self) -> u32 {
        self.edges
    }

    pub async fn run<E: EdgeSource>(&mut self, mut source: E) -> Result<Infallible, Fault> {
        if source.enable().is_err() {
            log_error!("button: {}", Fault::InterruptSetup);
            return Err(Fault::InterruptSetup);
        }
        log_info!("button: armed, hold {} ms", self.timer.period().as_millis());

        loop {
            source.wait_for_edge().await;
            if self.on_edge(&mut source) {
                yield_now().await;
            }
        }
    }
}
