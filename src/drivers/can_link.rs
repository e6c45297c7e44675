//! Measurement transmission over bxCAN.
//!
//! One standard data frame per measurement: volts as little-endian `f32`
//! followed by the raw average as little-endian `u32`.

use embassy_stm32::can::bxcan::filter::Mask32;
use embassy_stm32::can::bxcan::{Fifo, Frame, StandardId};
use embassy_stm32::can::Can;
use embassy_stm32::peripherals::CAN1;
use embassy_time::{with_timeout, Duration, TimeoutError};

use crate::state::Measurement;
use crate::tasks::link::TelemetryLink;

pub const MEASUREMENT_ID: u16 = 0x100;
pub const BITRATE: u32 = 500_000;
const TX_TIMEOUT: Duration = Duration::from_millis(10);

pub struct CanLink {
    can: Can<'static, CAN1>,
    id: StandardId,
}

impl CanLink {
    /// Accept-all filter, normal mode. Waits for bus synchronisation.
    pub async fn new(mut can: Can<'static, CAN1>) -> Option<Self> {
        can.as_mut()
            .modify_filters()
            .enable_bank(0, Fifo::Fifo0, Mask32::accept_all());
        can.as_mut()
            .modify_config()
            .set_loopback(false)
            .set_silent(false)
            .leave_disabled();
        can.set_bitrate(BITRATE);
        can.enable().await;

        let id = StandardId::new(MEASUREMENT_ID)?;
        Some(Self { can, id })
    }
}

pub fn encode(m: &Measurement) -> [u8; 8] {
    let mut data = [0u8; 8];
    data[..4].copy_from_slice(&m.volts.to_le_bytes());
    data[4..].copy_from_slice(&m.raw_average.to_le_bytes());
    data
}

impl TelemetryLink for CanLink {
    type Error = TimeoutError;

    async fn transmit(&mut self, m: Measurement) -> Result<(), TimeoutError> {
        let frame = Frame::new_data(self.id, encode(&m));
        with_timeout(TX_TIMEOUT, self.can.write(&frame)).await?;
        Ok(())
    }
}
