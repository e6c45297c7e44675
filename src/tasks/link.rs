use core::convert::Infallible;

use crate::queue::DistributionQueue;
use crate::state::Measurement;

/// Network side of the measurement fan-out.
pub trait TelemetryLink {
    type Error;

    async fn transmit(&mut self, m: Measurement) -> Result<(), Self::Error>;
}

/// Drains the measurement queue into a [`TelemetryLink`].
///
/// Runs on its own cadence: a slow link only makes the producer drop, it
/// never stalls it.
pub struct LinkConsumer<L> {
    link: L,
    sent: u32,
    failed: u32,
}

impl<L: TelemetryLink> LinkConsumer<L> {
    pub fn new(link: L) -> Self {
        Self { link, sent: 0, failed: 0 }
    }

    /// Transmit one measurement. `false` if the link refused it.
    pub async fn handle_one(&mut self, m: Measurement) -> bool {
        match self.link.transmit(m).await {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                true
            }
            Err(_) => {
                self.failed = self.failed.wrapping_add(1);
                log_warn!("link: transmit failed ({} total)", self.failed);
                false
            }
        }
    }

    pub async fn run(&mut self, queue: &DistributionQueue<Measurement>) -> Infallible {
        loop {
            let m = queue.receive().await;
            self.handle_one(m).await;
        }
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn link(&self) -> &L {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Refuses every other frame.
    #[derive(Default)]
    struct FlakyLink {
        calls: u32,
        delivered: heapless::Vec<u32, 8>,
    }

    impl TelemetryLink for FlakyLink {
        type Error = ();

        async fn transmit(&mut self, m: Measurement) -> Result<(), ()> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(());
            }
            let _ = self.delivered.push(m.raw_average);
            Ok(())
        }
    }

    #[tokio::test]
    async fn failures_are_counted_not_retried() {
        let mut consumer = LinkConsumer::new(FlakyLink::default());

        for raw in 1..=4 {
            consumer.handle_one(Measurement { raw_average: raw, volts: 0.0 }).await;
        }

        assert_eq!(consumer.sent(), 2);
        assert_eq!(consumer.failed(), 2);
        assert_eq!(consumer.link().delivered.as_slice(), &[1, 3]);
    }
}
