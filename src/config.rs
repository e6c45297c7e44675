//! Timing, conversion and scaling configuration.

use core::fmt;

use embassy_time::Duration;

use crate::error::Fault;

// ── Task timing ───────────────────────────────────────────────────────────────

/// Acquisition task wake period
pub const ACQUISITION_PERIOD: Duration = Duration::from_millis(100);
/// Heartbeat (command sender) period
pub const HEARTBEAT_PERIOD: Duration = Duration::from_millis(100);
/// Reductions per acquisition period
pub const CONVERSION_ITERATIONS: u8 = 4;
/// Pause between a reduction and the next software trigger
pub const INTER_GROUP_DELAY: Duration = Duration::from_millis(5);
/// Bound handed to the converter when stopping a group
pub const STOP_TIMEOUT: Duration = Duration::from_millis(1);
/// The status LED stays on until the button has been quiet this long
pub const LED_HOLD_PERIOD: Duration = Duration::from_millis(5000);

// ── Conversion ────────────────────────────────────────────────────────────────

/// Capacity of the raw result buffer shared by all groups
pub const RESULT_WINDOW_CAPACITY: usize = 16;
/// Analog input sampled by every group
pub const ANALOG_INPUT: u8 = 10;

const GROUP0_CHANNELS: [u8; 4] = [ANALOG_INPUT; 4];
const GROUP1_CHANNELS: [u8; 5] = [ANALOG_INPUT; 5];

/// Software-triggered groups known to the converter
pub const GROUPS: [GroupConfig; 2] = [
    GroupConfig { id: GroupId(0), channels: &GROUP0_CHANNELS },
    GroupConfig { id: GroupId(1), channels: &GROUP1_CHANNELS },
];

// ── Scaling & reporting ───────────────────────────────────────────────────────

pub const VREF_HIGH: f32 = 5.0;
pub const VREF_LOW: f32 = 0.0;
pub const ADC_RESOLUTION: Resolution = Resolution::Bits12;
/// Decimals printed in report lines
pub const REPORT_PRECISION: usize = 5;
/// Upper bound for `AcquisitionConfig::precision`; keeps a line inside `ReportLine`
pub const MAX_REPORT_PRECISION: usize = 9;

/// Index of a conversion group in the converter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GroupId(pub u8);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One software-triggered conversion group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupConfig {
    pub id: GroupId,
    pub channels: &'static [u8],
}

impl GroupConfig {
    pub const fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Bits8,
    Bits10,
    Bits12,
}

impl Resolution {
    /// Count that corresponds to the full reference span.
    pub const fn full_scale(self) -> u32 {
        match self {
            Resolution::Bits8 => 1 << 8,
            Resolution::Bits10 => 1 << 10,
            Resolution::Bits12 => 1 << 12,
        }
    }
}

/// Raw count to volts conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageScale {
    pub full_scale: u32,
    pub vref_high: f32,
    pub vref_low: f32,
}

impl VoltageScale {
    pub const fn new(resolution: Resolution, vref_high: f32, vref_low: f32) -> Self {
        Self { full_scale: resolution.full_scale(), vref_high, vref_low }
    }

    /// `(avg / full_scale) * (vref_high - vref_low)`; no low-reference offset.
    pub fn to_volts(&self, avg: u32) -> f32 {
        (avg as f32 / self.full_scale as f32) * (self.vref_high - self.vref_low)
    }
}

impl Default for VoltageScale {
    fn default() -> Self {
        Self::new(ADC_RESOLUTION, VREF_HIGH, VREF_LOW)
    }
}

/// Everything the acquisition task needs to know about its group.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionConfig {
    pub group: GroupConfig,
    pub iterations: u8,
    pub period: Duration,
    pub inter_group_delay: Duration,
    pub stop_timeout: Duration,
    /// `None` waits for the completion forever.
    pub completion_timeout: Option<Duration>,
    pub scale: VoltageScale,
    pub precision: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            group: GROUPS[0],
            iterations: CONVERSION_ITERATIONS,
            period: ACQUISITION_PERIOD,
            inter_group_delay: INTER_GROUP_DELAY,
            stop_timeout: STOP_TIMEOUT,
            completion_timeout: None,
            scale: VoltageScale::default(),
            precision: REPORT_PRECISION,
        }
    }
}

impl AcquisitionConfig {
    pub fn num_channels(&self) -> usize {
        self.group.num_channels()
    }

    /// Checked once before the task starts; any error is fatal.
    pub fn validate(&self) -> Result<(), Fault> {
        let n = self.num_channels();
        if n == 0 {
            return Err(Fault::InvalidConfig("group has no channels"));
        }
        if n > RESULT_WINDOW_CAPACITY {
            return Err(Fault::InvalidConfig("group exceeds result buffer"));
        }
        if self.group.channels.iter().any(|&ch| ch != ANALOG_INPUT) {
            return Err(Fault::InvalidConfig("group samples a foreign input"));
        }
        if self.iterations == 0 {
            return Err(Fault::InvalidConfig("zero conversion iterations"));
        }
        if self.scale.full_scale == 0 {
            return Err(Fault::InvalidConfig("zero full-scale count"));
        }
        if self.scale.vref_high <= self.scale.vref_low {
            return Err(Fault::InvalidConfig("reference span is not positive"));
        }
        if self.precision > MAX_REPORT_PRECISION {
            return Err(Fault::InvalidConfig("report precision too large"));
        }
        Ok(())
    }
}
