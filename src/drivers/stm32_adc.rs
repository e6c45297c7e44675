//! ADC1 on the STM32F405 as a group converter.
//!
//! The F4 regular sequencer is driven in single-conversion mode: a group
//! start samples the monitored input once per configured channel, fills the
//! result buffer from offset 0 and raises the completion.

use embassy_stm32::adc::{Adc, Resolution as AdcResolution, SampleTime};
use embassy_stm32::peripherals::{ADC1, PC0};
use embassy_time::{Delay, Duration};

use crate::completion::{CompletionSignal, GroupCompletion};
use crate::config::{GroupConfig, GroupId, Resolution, GROUPS, RESULT_WINDOW_CAPACITY};
use crate::drivers::adc::{ConversionDriver, DriverError, StartStatus};

pub struct Stm32Adc<'d> {
    adc: Adc<'d, ADC1>,
    input: PC0,
    completion: &'d CompletionSignal,
    results: [u16; RESULT_WINDOW_CAPACITY],
    active: Option<GroupId>,
}

impl<'d> Stm32Adc<'d> {
    pub fn new(
        adc: ADC1,
        input: PC0,
        resolution: Resolution,
        completion: &'d CompletionSignal,
    ) -> Self {
        let mut adc = Adc::new(adc, &mut Delay);
        adc.set_resolution(match resolution {
            Resolution::Bits8 => AdcResolution::EightBit,
            Resolution::Bits10 => AdcResolution::TenBit,
            Resolution::Bits12 => AdcResolution::TwelveBit,
        });
        adc.set_sample_time(SampleTime::Cycles480);

        Self {
            adc,
            input,
            completion,
            results: [0; RESULT_WINDOW_CAPACITY],
            active: None,
        }
    }

    fn group(id: GroupId) -> Option<&'static GroupConfig> {
        GROUPS.iter().find(|g| g.id == id)
    }
}

impl ConversionDriver for Stm32Adc<'_> {
    fn start(&mut self, group: GroupId) -> StartStatus {
        let Some(cfg) = Self::group(group) else {
            return StartStatus::Error;
        };
        if self.active.is_some_and(|g| g != group) {
            return StartStatus::Busy;
        }

        let n = cfg.num_channels();
        if n == 0 || n > RESULT_WINDOW_CAPACITY {
            return StartStatus::Error;
        }
        for slot in &mut self.results[..n] {
            *slot = self.adc.read(&mut self.input);
        }

        self.active = Some(group);
        self.completion.complete(GroupCompletion { group, last_offset: n - 1 });
        StartStatus::Accepted
    }

    fn stop(&mut self, group: GroupId, _timeout: Duration) -> Result<(), DriverError> {
        // Conversions finish inside `start`, so stopping never waits.
        match self.active {
            Some(g) if g != group => Err(DriverError::UnknownGroup),
            _ => {
                self.active = None;
                Ok(())
            }
        }
    }

    fn results(&self) -> &[u16] {
        &self.results
    }
}
