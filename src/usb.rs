//! USB CDC-ACM report channel.
//!
//! Report lines queued by the acquisition task are written out as single
//! packets while a host terminal holds the port open. Lines queued with no
//! host attached wait in the report queue, or are dropped once it is full.

use embassy_stm32::usb_otg::{self, Driver};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::report::{ReportQueue, REPORT_LINE_LEN};

bind_interrupts!(pub struct Irqs {
    OTG_FS => usb_otg::InterruptHandler<peripherals::USB_OTG_FS>;
});

pub type UsbDriver = Driver<'static, peripherals::USB_OTG_FS>;
pub type UsbSerial<'a> = CdcAcmClass<'a, UsbDriver>;

const MAX_PACKET: u16 = 64;

// One report line always fits a full-speed bulk packet.
const _: () = assert!(REPORT_LINE_LEN <= MAX_PACKET as usize);

static EP_OUT_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();

/// Must be called once.
pub fn init(
    usb_periph: peripherals::USB_OTG_FS,
    pa12: peripherals::PA12,
    pa11: peripherals::PA11,
) -> (UsbDevice<'static, UsbDriver>, UsbSerial<'static>) {
    let mut usb_config = usb_otg::Config::default();
    usb_config.vbus_detection = false;
    let driver = Driver::new_fs(
        usb_periph,
        Irqs,
        pa12,
        pa11,
        EP_OUT_BUF.init([0; 256]),
        usb_config,
    );

    let mut config = Config::new(0xc0de, 0xcafe);
    config.manufacturer = Some("adc-monitor");
    config.product = Some("ADC monitor report port");
    config.serial_number = Some("00000001");

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        &mut [], // msos_descs
        CONTROL_BUF.init([0; 64]),
    );

    let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), MAX_PACKET);
    (builder.build(), class)
}

#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

#[embassy_executor::task]
pub async fn report_task(mut serial: UsbSerial<'static>, queue: &'static ReportQueue) -> ! {
    loop {
        serial.wait_connection().await;
        defmt::info!("usb: report port open");

        loop {
            let line = queue.receive().await;
            if serial.write_packet(line.as_bytes()).await.is_err() {
                // Line is lost with the connection.
                defmt::info!("usb: report port closed");
                break;
            }
        }
    }
}
