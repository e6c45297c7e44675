//! Fatal fault taxonomy.
//!
//! A `Fault` means the converter, the interrupt wiring or the configuration
//! no longer matches what the software expects. Tasks stop on the first one
//! and hand it to the caller; the firmware entry point halts.

use thiserror::Error;

use crate::config::GroupId;
use crate::drivers::adc::StartStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// The converter did not accept a group start.
    #[error("group {group} start returned {status}")]
    StartRejected { group: GroupId, status: StartStatus },

    /// The converter could not stop the group within the stop timeout.
    #[error("group {group} did not stop")]
    StopFailed { group: GroupId },

    /// Completion offset does not describe a window of one result per channel.
    #[error("result window holds {actual} samples, group has {expected} channels")]
    WindowMismatch { expected: usize, actual: usize },

    /// Completion offset points past the end of the result buffer.
    #[error("result window {start}..={last} exceeds buffer of {len}")]
    WindowOutOfRange { start: usize, last: usize, len: usize },

    /// No completion arrived within the configured bound.
    #[error("group {group} never completed")]
    CompletionTimeout { group: GroupId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The button interrupt source could not be armed.
    #[error("interrupt source setup failed")]
    InterruptSetup,
}
