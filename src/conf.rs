use core::fmt;

use embedded_hal::digital::PinState::{High, Low};

use crate::op::modulation::lora::*;
use crate::op::packet::lora::*;
use crate::op::*;
use crate::reg::lora_sync_word;
use crate::rfswitch::{RfMode, RfSwitchTable};
use crate::sx::err::{code, StatusCode};

/// Crystal frequency of the STM32WL radio
pub const F_XTAL: u32 = 32_000_000;

/// Start-up time granted to the TCXO before the radio uses it
pub const TCXO_DELAY_US: u32 = 5_000;

/// Calculates the rf_freq value that should be passed to SX126x::set_rf_frequency
/// based on the desired RF frequency and the XTAL frequency.
///
/// 13.4.1.: RFfrequency = (RFfreq * Fxtal) / 2^25
pub const fn calc_rf_freq(rf_frequency: u32, f_xtal: u32) -> u32 {
    (((rf_frequency as u64) << 25) / f_xtal as u64) as u32
}

/// Radio settings as a human writes them down. Turned into a [`Config`]
/// for the driver with `Config::try_from`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadioConfig {
    /// Carrier frequency in MHz, 150 to 960
    pub frequency_mhz: f32,
    /// LoRa bandwidth in kHz, one of 7.8, 10.4, 15.6, 20.8, 31.25, 41.7,
    /// 62.5, 125, 250 or 500
    pub bandwidth_khz: f32,
    /// 5 to 12
    pub spreading_factor: u8,
    /// Denominator of the coding rate: 5 (4/5) to 8 (4/8)
    pub coding_rate: u8,
    /// One-byte LoRa sync word, 0x12 for private networks
    pub sync_word: u8,
    /// Output power in dBm
    pub power_dbm: i8,
    /// Preamble length in symbols
    pub preamble_len: u16,
    /// Voltage DIO3 supplies to the TCXO, `None` for a plain crystal
    pub tcxo_voltage: Option<f32>,
    /// Power the radio from the LDO instead of the DC-DC converter
    pub use_ldo: bool,
    /// Force low data rate optimization on, regardless of the symbol time
    pub force_ldro: bool,
    /// Receive with boosted LNA gain
    pub rx_boosted_gain: bool,
    /// Payload length of implicit header packets, `None` for explicit headers
    pub implicit_header_len: Option<u8>,
}

/// Settings of the Rigel receiver
pub const RIGEL: RadioConfig = RadioConfig {
    frequency_mhz: 915.0,
    bandwidth_khz: 10.4,
    spreading_factor: 12,
    coding_rate: 6,
    sync_word: 0x12,
    power_dbm: 10,
    preamble_len: 8,
    tcxo_voltage: Some(3.0),
    use_ldo: false,
    force_ldro: true,
    rx_boosted_gain: true,
    implicit_header_len: Some(8),
};

/// RF switch of the NUCLEO-WL55JC1 and Rigel boards, on PC3, PC4 and PC5
pub const RIGEL_RF_SWITCH: RfSwitchTable = RfSwitchTable::new()
    .with(RfMode::Idle, [Low, Low, Low])
    .with(RfMode::Rx, [High, High, Low])
    .with(RfMode::TxLp, [High, High, High])
    .with(RfMode::TxHp, [High, Low, High]);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    InvalidFrequency,
    InvalidBandwidth,
    InvalidSpreadingFactor,
    InvalidCodingRate,
    InvalidOutputPower,
    InvalidPreambleLength,
    InvalidTcxoVoltage,
}

impl StatusCode for ConfigError {
    fn code(&self) -> i16 {
        match self {
            ConfigError::InvalidFrequency => code::INVALID_FREQUENCY,
            ConfigError::InvalidBandwidth => code::INVALID_BANDWIDTH,
            ConfigError::InvalidSpreadingFactor => code::INVALID_SPREADING_FACTOR,
            ConfigError::InvalidCodingRate => code::INVALID_CODING_RATE,
            ConfigError::InvalidOutputPower => code::INVALID_OUTPUT_POWER,
            ConfigError::InvalidPreambleLength => code::INVALID_PREAMBLE_LENGTH,
            ConfigError::InvalidTcxoVoltage => code::INVALID_TCXO_VOLTAGE,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            ConfigError::InvalidFrequency => "frequency",
            ConfigError::InvalidBandwidth => "bandwidth",
            ConfigError::InvalidSpreadingFactor => "spreading factor",
            ConfigError::InvalidCodingRate => "coding rate",
            ConfigError::InvalidOutputPower => "output power",
            ConfigError::InvalidPreambleLength => "preamble length",
            ConfigError::InvalidTcxoVoltage => "TCXO voltage",
        };
        write!(f, "invalid {}", what)
    }
}

/// Configuration parameters.
/// Used to initialize the SX126x modem
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Packet type
    pub packet_type: PacketType,
    /// LoRa sync word, register value
    pub sync_word: u16,
    /// Calibration parameters
    pub calib_param: CalibParam,
    /// LDO or DC-DC
    pub regulator_mode: RegulatorMode,
    /// TCXO supply voltage and start-up delay, `None` for a crystal
    pub tcxo_opts: Option<(TcxoVoltage, TcxoDelay)>,
    /// Modulation parameters
    pub mod_params: LoraModParams,
    /// Packet parameters
    pub packet_params: LoRaPacketParams,
    /// Output power, the PA is picked from this and the RF switch table
    pub tx_power_dbm: i8,
    /// DIO1 IRQ mask
    pub dio1_irq_mask: IrqMask,
    /// RF freq, calculated using crate::conf::calc_rf_freq
    pub rf_freq: u32,
    /// RF frequency in Hz
    pub rf_frequency: u32,
}

impl TryFrom<&RadioConfig> for Config {
    type Error = ConfigError;

    fn try_from(radio: &RadioConfig) -> Result<Self, Self::Error> {
        if !(150.0..=960.0).contains(&radio.frequency_mhz) {
            return Err(ConfigError::InvalidFrequency);
        }
        let rf_frequency = (radio.frequency_mhz as f64 * 1_000_000.0 + 0.5) as u32;

        let bandwidth =
            LoraBandWidth::from_khz(radio.bandwidth_khz).ok_or(ConfigError::InvalidBandwidth)?;
        let spread_factor = LoRaSpreadFactor::from_factor(radio.spreading_factor)
            .ok_or(ConfigError::InvalidSpreadingFactor)?;
        let coding_rate = LoraCodingRate::from_denominator(radio.coding_rate)
            .ok_or(ConfigError::InvalidCodingRate)?;

        if !(-17..=22).contains(&radio.power_dbm) {
            return Err(ConfigError::InvalidOutputPower);
        }
        if radio.preamble_len == 0 {
            return Err(ConfigError::InvalidPreambleLength);
        }

        let tcxo_opts = match radio.tcxo_voltage {
            Some(volts) => Some((
                TcxoVoltage::from_volts(volts).ok_or(ConfigError::InvalidTcxoVoltage)?,
                TcxoDelay::from_us(TCXO_DELAY_US),
            )),
            None => None,
        };

        let regulator_mode = if radio.use_ldo {
            RegulatorMode::Ldo
        } else {
            RegulatorMode::DcDc
        };

        let mod_params = LoraModParams::default()
            .set_spread_factor(spread_factor)
            .set_bandwidth(bandwidth)
            .set_coding_rate(coding_rate);
        let packet_params = LoRaPacketParams::default().set_preamble_len(radio.preamble_len);

        Ok(Config {
            packet_type: PacketType::LoRa,
            sync_word: lora_sync_word(radio.sync_word),
            calib_param: CalibParam::all(),
            regulator_mode,
            tcxo_opts,
            mod_params,
            packet_params,
            tx_power_dbm: radio.power_dbm,
            dio1_irq_mask: IrqMask::rx_finished(),
            rf_freq: calc_rf_freq(rf_frequency, F_XTAL),
            rf_frequency,
        })
    }
}
