//! ADC monitor firmware core.
//!
//! A periodic acquisition task samples one analog input as a conversion
//! group, waits for the completion raised from interrupt context, reduces the
//! result window to a voltage and fans it out through capacity-1 queues. A
//! button edge holds the status LED on until the hold timer runs out.
//!
//! Everything here builds on the host. The STM32F405 drivers, the board and
//! the USB report channel only exist with the `hardware` feature.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)] // single-threaded executor, Send bounds not needed

#[macro_use]
mod log;

pub mod actuator;
pub mod completion;
pub mod config;
pub mod drivers;
pub mod error;
pub mod queue;
pub mod report;
pub mod state;
pub mod tasks;

#[cfg(feature = "hardware")]
pub mod board;
#[cfg(feature = "hardware")]
pub mod usb;

pub use actuator::{Actuator, Level, SharedActuator};
pub use completion::{CompletionSignal, GroupCompletion};
pub use config::{AcquisitionConfig, GroupConfig, GroupId, Resolution, VoltageScale};
pub use error::Fault;
pub use queue::DistributionQueue;
pub use report::{ReportLine, ReportSink};
pub use state::Measurement;
