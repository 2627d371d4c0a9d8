//! Rigel receiver firmware for STM32WL5x boards: listens for LoRa packets
//! and prints them on USART2.

#![no_std]
#![no_main]

mod serial;
mod subghz;

use defmt_rtt as _; // global logger
use panic_probe as _; // panic handler

use rigel_rx::conf::{RIGEL, RIGEL_RF_SWITCH};
use rigel_rx::{receiver, Console, SX126x};
use stm32wlxx_hal::{
    self as hal,
    gpio::{Output, PortA, PortC},
    pac,
    uart::{self, Uart2},
};

use serial::UsartWrite;
use subghz::{RadioBusy, RadioReset, RfCtrlPin, SubGhzSpi};

/// Baud rate of the console on USART2 (PA2)
const CONSOLE_BAUD: u32 = 115_200;

#[hal::cortex_m_rt::entry]
fn main() -> ! {
    let mut dp: pac::Peripherals = defmt::unwrap!(pac::Peripherals::take());

    // The console UART is clocked from HSI16
    dp.RCC.cr.modify(|_, w| w.hsion().set_bit());
    while dp.RCC.cr.read().hsirdy().bit_is_clear() {}

    let gpioa = PortA::split(dp.GPIOA, &mut dp.RCC);
    let gpioc = PortC::split(dp.GPIOC, &mut dp.RCC);

    let (tx, rf_ctrl) = cortex_m::interrupt::free(|cs| {
        let tx = Uart2::new(dp.USART2, CONSOLE_BAUD, uart::Clk::Hsi16, &mut dp.RCC)
            .enable_tx(gpioa.a2, cs);
        let rf_ctrl = [
            RfCtrlPin::C3(Output::default(gpioc.c3, cs)),
            RfCtrlPin::C4(Output::default(gpioc.c4, cs)),
            RfCtrlPin::C5(Output::default(gpioc.c5, cs)),
        ];
        (tx, rf_ctrl)
    });

    let spi = SubGhzSpi::new(dp.SPI3, &mut dp.RCC);
    let mut radio = SX126x::new(spi, (RadioReset, RadioBusy), rf_ctrl);
    let mut console = Console::new(UsartWrite::init(tx));

    let err = receiver::run(&mut radio, &mut console, &RIGEL, RIGEL_RF_SWITCH);
    defmt::error!("halted: {}", err);

    loop {
        cortex_m::asm::wfi();
    }
}
