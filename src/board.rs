//! STM32F405 bring-up and pin assignment.
//!
//! `Board::init` configures the clock tree and hands out the peripherals the
//! monitor uses, grouped by role. Everything else stays unclaimed.

use embassy_stm32::peripherals::{
    ADC1, CAN1, EXTI0, PA0, PA11, PA12, PB8, PB9, PC0, PC13, USB_OTG_FS,
};
use embassy_stm32::rcc::*;
use embassy_stm32::time::Hertz;
use embassy_stm32::Config;

/// 8 MHz crystal on the board.
const HSE_FREQ: Hertz = Hertz(8_000_000);

/// Monitored analog input, ADC123_IN10.
pub struct AnalogInput {
    pub adc: ADC1,
    pub pin: PC0,
}

/// User button, pressed = high, rising edge on EXTI0.
pub struct ButtonPins {
    pub pin: PA0,
    pub line: EXTI0,
}

pub struct CanPins {
    pub can: CAN1,
    pub rx: PB8,
    pub tx: PB9,
}

/// USB OTG FS, CDC-ACM report port.
pub struct UsbPins {
    pub otg: USB_OTG_FS,
    pub dp: PA12,
    pub dm: PA11,
}

pub struct Board {
    pub analog: AnalogInput,
    pub button: ButtonPins,
    /// Active-low status LED
    pub led: PC13,
    pub can: CanPins,
    pub usb: UsbPins,
}

/// 168 MHz sysclk, 48 MHz USB clock. APB1 at 42 MHz feeds bxCAN, APB2 at
/// 84 MHz feeds the ADC.
fn clock_config() -> Config {
    let mut config = Config::default();
    config.rcc.hse = Some(Hse { freq: HSE_FREQ, mode: HseMode::Oscillator });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config
}

impl Board {
    pub fn init() -> Self {
        let p = embassy_stm32::init(clock_config());

        Self {
            analog: AnalogInput { adc: p.ADC1, pin: p.PC0 },
            button: ButtonPins { pin: p.PA0, line: p.EXTI0 },
            led: p.PC13,
            can: CanPins { can: p.CAN1, rx: p.PB8, tx: p.PB9 },
            usb: UsbPins { otg: p.USB_OTG_FS, dp: p.PA12, dm: p.PA11 },
        }
    }
}
