//! Conversion peripheral boundary and result-window reduction.

use core::fmt;

use embassy_time::Duration;

use crate::config::GroupId;
use crate::error::Fault;

/// Answer of the converter to a software group trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartStatus {
    Accepted,
    /// Another group is still converting
    Busy,
    Error,
}

impl fmt::Display for StartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StartStatus::Accepted => "accepted",
            StartStatus::Busy => "busy",
            StartStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    Timeout,
    UnknownGroup,
    Hardware,
}

/// Group-conversion peripheral.
///
/// Completion is not returned from `start`: the driver raises it on the
/// [`CompletionSignal`](crate::completion::CompletionSignal) it was built
/// with, from interrupt context on real hardware.
pub trait ConversionDriver {
    fn start(&mut self, group: GroupId) -> StartStatus;

    fn stop(&mut self, group: GroupId, timeout: Duration) -> Result<(), DriverError>;

    /// Raw result buffer, written by the peripheral.
    fn results(&self) -> &[u16];
}

/// Truncating average of `window[start..=last_offset]`.
///
/// The completion offset must describe exactly `num_channels` results;
/// anything else means the converter and the software disagree about the
/// group layout.
pub fn reduce_window(
    window: &[u16],
    start: usize,
    last_offset: usize,
    num_channels: usize,
) -> Result<u32, Fault> {
    let actual = last_offset.checked_sub(start).map_or(0, |d| d.saturating_add(1));
    if num_channels == 0 || actual != num_channels {
        return Err(Fault::WindowMismatch { expected: num_channels, actual });
    }

    let samples = window.get(start..=last_offset).ok_or(Fault::WindowOutOfRange {
        start,
        last: last_offset,
        len: window.len(),
    })?;

    let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
    Ok(sum / num_channels as u32)
}
