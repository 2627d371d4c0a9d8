//! The radio side of the STM32WL: SPI3 (SUBGHZSPI) with its slave select
//! in PWR, the radio reset in RCC and the busy signal in PWR.
//! See RM0453 section 4.

use core::convert::Infallible;
use core::ptr::{read_volatile, write_volatile};

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};
use stm32wlxx_hal::gpio::{pins, Output, PinState};
use stm32wlxx_hal::pac;

/// Core clock after reset, MSI at 4 MHz
const SYSCLK_HZ: u64 = 4_000_000;

const NOP: u8 = 0xFF;

pub struct SubGhzSpi {
    spi: pac::SPI3,
}

impl SubGhzSpi {
    pub fn new(spi: pac::SPI3, rcc: &mut pac::RCC) -> Self {
        rcc.apb3enr.modify(|_, w| w.subghzspien().set_bit());
        rcc.apb3rstr.write(|w| w.subghzspirst().set_bit());
        rcc.apb3rstr.write(|w| w.subghzspirst().clear_bit());

        #[rustfmt::skip]
        spi.cr2.write(|w| unsafe {
            w
                // 8-bit data size
                .ds().bits(0b111)
                // RXNE generated on 8-bits
                .frxth().set_bit()
        });

        #[rustfmt::skip]
        spi.cr1.write(|w| {
            w
                .cpha().clear_bit()
                .cpol().clear_bit()
                .mstr().set_bit()
                // internal bus, no baud rate divisor
                .br().bits(0b000)
                .lsbfirst().clear_bit()
                .ssm().set_bit()
                .ssi().set_bit()
                .rxonly().clear_bit()
                .bidioe().clear_bit()
                .bidimode().clear_bit()
                .spe().set_bit()
        });

        Self { spi }
    }

    fn select(&mut self, selected: bool) {
        // Only this driver touches SUBGHZSPICR
        let dp = unsafe { pac::Peripherals::steal() };
        dp.PWR.subghzspicr.write(|w| w.nss().bit(!selected));
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        while self.spi.sr.read().txe().bit_is_clear() {}
        unsafe { write_volatile(self.spi.dr.as_ptr() as *mut u8, byte) };
        while self.spi.sr.read().rxne().bit_is_clear() {}
        unsafe { read_volatile(self.spi.dr.as_ptr() as *const u8) }
    }
}

impl spi::ErrorType for SubGhzSpi {
    type Error = Infallible;
}

impl SpiDevice for SubGhzSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut selected = false;
        for op in operations.iter_mut() {
            if !selected && !matches!(op, Operation::DelayNs(_)) {
                self.select(true);
                selected = true;
            }
            match op {
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.exchange(NOP);
                    }
                }
                Operation::Write(buf) => {
                    for b in buf.iter() {
                        self.exchange(*b);
                    }
                }
                Operation::Transfer(read, write) => {
                    for i in 0..read.len().max(write.len()) {
                        let b = self.exchange(write.get(i).copied().unwrap_or(NOP));
                        if let Some(r) = read.get_mut(i) {
                            *r = b;
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.exchange(*b);
                    }
                }
                Operation::DelayNs(ns) => delay_ns(*ns),
            }
        }
        if selected {
            self.select(false);
        }
        Ok(())
    }
}

fn delay_ns(ns: u32) {
    let cycles = u64::from(ns) * SYSCLK_HZ / 1_000_000_000 + 1;
    cortex_m::asm::delay(cycles as u32);
}

/// Radio reset, driven through RCC_CSR.RFRST. Low holds the radio in reset.
pub struct RadioReset;

impl ErrorType for RadioReset {
    type Error = Infallible;
}

impl OutputPin for RadioReset {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let dp = unsafe { pac::Peripherals::steal() };
        dp.RCC.csr.modify(|_, w| w.rfrst().set_bit());
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let dp = unsafe { pac::Peripherals::steal() };
        dp.RCC.csr.modify(|_, w| w.rfrst().clear_bit());
        Ok(())
    }
}

/// Radio busy signal, PWR_SR2.RFBUSYS
pub struct RadioBusy;

impl ErrorType for RadioBusy {
    type Error = Infallible;
}

impl InputPin for RadioBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let dp = unsafe { pac::Peripherals::steal() };
        Ok(dp.PWR.sr2.read().rfbusys().bit_is_set())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|busy| !busy)
    }
}

/// One of the RF switch control lines, PC3, PC4 or PC5
pub enum RfCtrlPin {
    C3(Output<pins::C3>),
    C4(Output<pins::C4>),
    C5(Output<pins::C5>),
}

impl ErrorType for RfCtrlPin {
    type Error = Infallible;
}

impl OutputPin for RfCtrlPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_level(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_level(PinState::High);
        Ok(())
    }
}

impl RfCtrlPin {
    fn set_level(&mut self, level: PinState) {
        match self {
            RfCtrlPin::C3(pin) => pin.set_level(level),
            RfCtrlPin::C4(pin) => pin.set_level(level),
            RfCtrlPin::C5(pin) => pin.set_level(level),
        }
    }
}
