//! Simulated group converter for host builds.
//!
//! A start copies the configured sample pattern into the result window and
//! raises the completion the way the end-of-conversion interrupt would.
//! Faults are scripted through the builder methods.

use embassy_time::Duration;

use crate::completion::{CompletionSignal, GroupCompletion};
use crate::config::{GroupId, RESULT_WINDOW_CAPACITY};
use crate::drivers::adc::{ConversionDriver, DriverError, StartStatus};

pub struct SimulatedAdc<'a> {
    completion: &'a CompletionSignal,
    results: [u16; RESULT_WINDOW_CAPACITY],
    pattern: heapless::Vec<u16, RESULT_WINDOW_CAPACITY>,
    last_offset: Option<usize>,
    reject_after: Option<(u32, StartStatus)>,
    fail_stop: bool,
    silent: bool,
    converting: Option<GroupId>,
    starts: u32,
    stops: u32,
}

impl<'a> SimulatedAdc<'a> {
    /// Patterns longer than the result buffer are cut to fit.
    pub fn new(completion: &'a CompletionSignal, samples: &[u16]) -> Self {
        let mut sim = Self {
            completion,
            results: [0; RESULT_WINDOW_CAPACITY],
            pattern: heapless::Vec::new(),
            last_offset: None,
            reject_after: None,
            fail_stop: false,
            silent: false,
            converting: None,
            starts: 0,
            stops: 0,
        };
        sim.set_samples(samples);
        sim
    }

    pub fn set_samples(&mut self, samples: &[u16]) {
        self.pattern.clear();
        let n = samples.len().min(RESULT_WINDOW_CAPACITY);
        let _ = self.pattern.extend_from_slice(&samples[..n]);
    }

    /// Report this offset instead of the real end of the pattern.
    pub fn with_last_offset(mut self, offset: usize) -> Self {
        self.last_offset = Some(offset);
        self
    }

    /// Answer `status` to every start after the first `accepted` ones.
    pub fn reject_after(mut self, accepted: u32, status: StartStatus) -> Self {
        self.reject_after = Some((accepted, status));
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Accept starts but never raise a completion.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl ConversionDriver for SimulatedAdc<'_> {
    fn start(&mut self, group: GroupId) -> StartStatus {
        if let Some((accepted, status)) = self.reject_after {
            if self.starts >= accepted {
                return status;
            }
        }
        if self.converting.is_some() {
            return StartStatus::Busy;
        }
        self.starts += 1;

        self.results[..self.pattern.len()].copy_from_slice(&self.pattern);
        if self.silent {
            self.converting = Some(group);
            return StartStatus::Accepted;
        }

        let last_offset = self
            .last_offset
            .unwrap_or_else(|| self.pattern.len().saturating_sub(1));
        self.completion.complete(GroupCompletion { group, last_offset });
        StartStatus::Accepted
    }

    fn stop(&mut self, _group: GroupId, _timeout: Duration) -> Result<(), DriverError> {
        self.stops += 1;
        if self.fail_stop {
            return Err(DriverError::Timeout);
        }
        self.converting = None;
        Ok(())
    }

    fn results(&self) -> &[u16] {
        &self.results
    }
}
