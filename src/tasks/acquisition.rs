use core::convert::Infallible;

use embassy_time::{with_timeout, Ticker, Timer};

use crate::completion::{CompletionSignal, GroupCompletion};
use crate::config::{AcquisitionConfig, GroupId};
use crate::drivers::adc::{reduce_window, ConversionDriver, StartStatus};
use crate::error::Fault;
use crate::queue::DistributionQueue;
use crate::report::{format_measurement, ReportSink};
use crate::state::Measurement;

/// Periodic group acquisition.
///
/// Each period triggers the configured group, reduces `iterations` result
/// windows to voltages, reports every one of them and stops the group. The
/// last measurement of the period goes to the measurement queue once the
/// period boundary has passed.
pub struct AcquisitionTask<'a, D, S> {
    driver: D,
    completion: &'a CompletionSignal,
    sink: S,
    config: AcquisitionConfig,
}

impl<'a, D: ConversionDriver, S: ReportSink> AcquisitionTask<'a, D, S> {
    /// The configuration is validated here, before anything is triggered.
    pub fn new(
        driver: D,
        completion: &'a CompletionSignal,
        sink: S,
        config: AcquisitionConfig,
    ) -> Result<Self, Fault> {
        config.validate()?;
        Ok(Self { driver, completion, sink, config })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// One period. `Ok(None)` only if no iteration ran, which a validated
    /// configuration rules out.
    pub async fn run_period(&mut self) -> Result<Option<Measurement>, Fault> {
        let group = self.config.group.id;
        let num_channels = self.config.num_channels();

        // A completion left from the previous period's trailing start is stale.
        self.completion.clear();
        self.trigger(group)?;

        let mut last = None;
        for _ in 0..self.config.iterations {
            let done = self.await_completion(group).await?;

            let raw_average = reduce_window(self.driver.results(), 0, done.last_offset, num_channels)
                .inspect_err(|f| log_error!("acquisition: {}", f))?;
            let volts = self.config.scale.to_volts(raw_average);

            self.sink.emit(&format_measurement(volts, self.config.precision));
            last = Some(Measurement { raw_average, volts });

            Timer::after(self.config.inter_group_delay).await;
            self.trigger(group)?;
        }

        if self.driver.stop(group, self.config.stop_timeout).is_err() {
            let fault = Fault::StopFailed { group };
            log_error!("acquisition: {}", fault);
            return Err(fault);
        }

        Ok(last)
    }

    /// Runs periods forever. Returns only on a fault.
    pub async fn run(&mut self, out: &DistributionQueue<Measurement>) -> Result<Infallible, Fault> {
        log_info!(
            "acquisition: group {} ({} ch) x{}",
            self.config.group.id,
            self.config.num_channels(),
            self.config.iterations
        );

        let mut ticker = Ticker::every(self.config.period);
        loop {
            let last = self.run_period().await?;
            ticker.next().await;

            if let Some(m) = last {
                if !out.try_publish(m) {
                    log_debug!("acquisition: measurement queue full, dropped {}", m.volts);
                }
            }
        }
    }

    fn trigger(&mut self, group: GroupId) -> Result<(), Fault> {
        match self.driver.start(group) {
            StartStatus::Accepted => Ok(()),
            status => {
                let fault = Fault::StartRejected { group, status };
                log_error!("acquisition: {}", fault);
                Err(fault)
            }
        }
    }

    async fn await_completion(&self, group: GroupId) -> Result<GroupCompletion, Fault> {
        match self.config.completion_timeout {
            None => Ok(self.completion.wait().await),
            Some(limit) => with_timeout(limit, self.completion.wait()).await.map_err(|_| {
                let fault = Fault::CompletionTimeout { group };
                log_error!("acquisition: {}", fault);
                fault
            }),
        }
    }
}
