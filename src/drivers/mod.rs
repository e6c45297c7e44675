pub mod adc;
pub mod sim;

#[cfg(feature = "hardware")]
pub mod can_link;
#[cfg(feature = "hardware")]
pub mod exti_button;
#[cfg(feature = "hardware")]
pub mod status_led;
#[cfg(feature = "hardware")]
pub mod stm32_adc;
