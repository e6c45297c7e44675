//! Human-readable measurement reports.
//!
//! Lines are formatted into fixed-capacity strings and handed to a sink that
//! gives no acknowledgement. On target the sink is a small queue drained by
//! the USB serial task.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

pub const REPORT_LINE_LEN: usize = 64;
pub const REPORT_QUEUE_DEPTH: usize = 4;

pub const REPORT_HEADER: &str = "ADC result: ";
pub const INIT_OK_LINE: &str = "adc-monitor: init OK\r\n";

pub type ReportLine = heapless::String<REPORT_LINE_LEN>;
pub type ReportQueue = Channel<CriticalSectionRawMutex, ReportLine, REPORT_QUEUE_DEPTH>;

/// Accepts one formatted text line.
pub trait ReportSink {
    fn emit(&mut self, line: &str);
}

/// `"ADC result: 0.12207 V\r\n"` for `precision == 5`.
pub fn format_measurement(volts: f32, precision: usize) -> ReportLine {
    let mut line = ReportLine::new();
    // Overlong renderings are cut at the failing fragment.
    let _ = write!(line, "{}{:.*} V\r\n", REPORT_HEADER, precision, volts);
    line
}

/// Sink that forwards lines to a [`ReportQueue`], dropping them when full.
pub struct QueueSink<'a> {
    queue: &'a ReportQueue,
    dropped: u32,
}

impl<'a> QueueSink<'a> {
    pub fn new(queue: &'a ReportQueue) -> Self {
        Self { queue, dropped: 0 }
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl ReportSink for QueueSink<'_> {
    fn emit(&mut self, line: &str) {
        let mut owned = ReportLine::new();
        if owned.push_str(line).is_err() || self.queue.try_send(owned).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }
}
