//! Values exchanged between tasks through the distribution queues.
//!
//! All types are `Copy` so a send moves a few words and never a reference
//! into another task's storage.

// ── Data types ────────────────────────────────────────────────────────────────

/// One reduced conversion group, computed once per iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Truncated integer average of the result window
    pub raw_average: u32,
    pub volts: f32,
}

/// Payload carried by the heartbeat → command queue.
pub type CommandCode = u32;
