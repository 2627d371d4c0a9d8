use core::fmt;

use crate::conf::ConfigError;

/// Numeric code of a failed radio operation, as printed on the console.
/// Codes are negative; 0 means success and is never reported.
pub trait StatusCode {
    fn code(&self) -> i16;
}

pub mod code {
    pub const PIN: i16 = -1;
    pub const CHIP_NOT_FOUND: i16 = -2;
    pub const RX_TIMEOUT: i16 = -6;
    pub const CRC_MISMATCH: i16 = -7;
    pub const INVALID_BANDWIDTH: i16 = -8;
    pub const INVALID_SPREADING_FACTOR: i16 = -9;
    pub const INVALID_CODING_RATE: i16 = -10;
    pub const INVALID_FREQUENCY: i16 = -12;
    pub const INVALID_OUTPUT_POWER: i16 = -13;
    pub const SPI: i16 = -16;
    pub const INVALID_TCXO_VOLTAGE: i16 = -19;
    pub const INVALID_PREAMBLE_LENGTH: i16 = -20;
    pub const BUSY_TIMEOUT: i16 = -705;
    pub const XOSC_START: i16 = -707;
}

#[derive(Debug, PartialEq, Eq)]
pub enum SpiError<TSPIERR> {
    Write(TSPIERR),
    Transfer(TSPIERR),
}

#[derive(Debug, PartialEq, Eq)]
pub enum PinError<TPINERR> {
    Input(TPINERR),
    Output(TPINERR),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SxError<TSPIERR, TPINERR> {
    Spi(SpiError<TSPIERR>),
    Pin(PinError<TPINERR>),
    /// The busy line did not drop within the allowed time
    BusyTimeout,
    /// The chip did not report a standby mode after SetStandby
    ChipNotFound,
    /// The 32 MHz oscillator failed to start after TCXO setup
    XoscStart,
    Config(ConfigError),
    /// No packet arrived within the receive window
    RxTimeout,
    /// A packet arrived, but its header or payload CRC was wrong
    CrcMismatch,
}

impl<TSPIERR, TPINERR> From<SpiError<TSPIERR>> for SxError<TSPIERR, TPINERR> {
    fn from(spi_err: SpiError<TSPIERR>) -> Self {
        SxError::Spi(spi_err)
    }
}

impl<TSPIERR, TPINERR> From<PinError<TPINERR>> for SxError<TSPIERR, TPINERR> {
    fn from(pin_err: PinError<TPINERR>) -> Self {
        SxError::Pin(pin_err)
    }
}

impl<TSPIERR, TPINERR> From<ConfigError> for SxError<TSPIERR, TPINERR> {
    fn from(conf_err: ConfigError) -> Self {
        SxError::Config(conf_err)
    }
}

impl<TSPIERR, TPINERR> StatusCode for SxError<TSPIERR, TPINERR> {
    fn code(&self) -> i16 {
        match self {
            SxError::Spi(_) => code::SPI,
            SxError::Pin(_) => code::PIN,
            SxError::BusyTimeout => code::BUSY_TIMEOUT,
            SxError::ChipNotFound => code::CHIP_NOT_FOUND,
            SxError::XoscStart => code::XOSC_START,
            SxError::Config(conf_err) => conf_err.code(),
            SxError::RxTimeout => code::RX_TIMEOUT,
            SxError::CrcMismatch => code::CRC_MISMATCH,
        }
    }
}

impl<TSPIERR, TPINERR> fmt::Display for SxError<TSPIERR, TPINERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SxError::Spi(SpiError::Write(_)) => f.write_str("SPI write failed"),
            SxError::Spi(SpiError::Transfer(_)) => f.write_str("SPI transfer failed"),
            SxError::Pin(PinError::Input(_)) => f.write_str("reading a radio pin failed"),
            SxError::Pin(PinError::Output(_)) => f.write_str("driving a radio pin failed"),
            SxError::BusyTimeout => f.write_str("radio stayed busy"),
            SxError::ChipNotFound => f.write_str("radio not found"),
            SxError::XoscStart => f.write_str("oscillator did not start"),
            SxError::Config(conf_err) => conf_err.fmt(f),
            SxError::RxTimeout => f.write_str("receive timed out"),
            SxError::CrcMismatch => f.write_str("CRC mismatch"),
        }
    }
}
