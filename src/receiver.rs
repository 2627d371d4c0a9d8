//! Bring-up and the blocking receive loop, written against the [`Radio`]
//! trait so they run the same on the board and in tests.

use core::fmt;

use crate::conf::RadioConfig;
use crate::console::Console;
use crate::rfswitch::RfSwitchTable;
use crate::sx::err::StatusCode;

/// Longest LoRa payload
pub const MAX_PAYLOAD_LEN: usize = 255;

pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

#[derive(Clone, Debug, PartialEq)]
pub struct ReceivedPacket {
    pub payload: Payload,
    /// dBm
    pub rssi: f32,
    /// dB
    pub snr: f32,
}

/// Outcome of a single [`Radio::receive`]
#[derive(Clone, Debug, PartialEq)]
pub enum ReceiveStatus {
    Success(ReceivedPacket),
    Timeout,
    CrcMismatch,
    /// Any other failure, with its status code
    Other(i16),
}

/// The operations of a LoRa radio the receiver needs
#[cfg_attr(test, mockall::automock(type Error = tests::FakeError;))]
pub trait Radio {
    type Error: StatusCode;

    fn set_rf_switch_table(&mut self, table: RfSwitchTable);

    /// Reset and configure the radio
    fn begin(&mut self, conf: &RadioConfig) -> Result<(), Self::Error>;

    fn set_tcxo(&mut self, volts: f32) -> Result<(), Self::Error>;

    fn force_ldro(&mut self, enable: bool) -> Result<(), Self::Error>;

    fn set_rx_boosted_gain_mode(&mut self, boosted: bool) -> Result<(), Self::Error>;

    fn implicit_header(&mut self, payload_len: u8) -> Result<(), Self::Error>;

    /// Block until a packet arrives or the receive window closes
    fn receive(&mut self) -> ReceiveStatus;
}

/// Stage of the bring-up that failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    Begin,
    Tcxo,
    Ldro,
    RxGain,
    ImplicitHeader,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitError {
    pub step: InitStep,
    pub code: i16,
}

impl InitError {
    fn at<E: StatusCode>(step: InitStep) -> impl FnOnce(E) -> Self {
        move |err| Self {
            step,
            code: err.code(),
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} failed with code {}", self.step, self.code)
    }
}

/// Bring the radio up and apply the settings `begin` does not cover.
/// Every failure is fatal.
pub fn setup<R, W>(
    radio: &mut R,
    console: &mut Console<W>,
    conf: &RadioConfig,
    rf_switch: RfSwitchTable,
) -> Result<(), InitError>
where
    R: Radio,
    W: fmt::Write,
{
    radio.set_rf_switch_table(rf_switch);

    console.initializing();
    let res = radio.begin(conf).map_err(InitError::at(InitStep::Begin));
    report(console, res)?;

    console.configuring();
    report(console, configure(radio, conf))?;

    info!("receiver ready");
    Ok(())
}

fn configure<R: Radio>(radio: &mut R, conf: &RadioConfig) -> Result<(), InitError> {
    if let Some(volts) = conf.tcxo_voltage {
        radio.set_tcxo(volts).map_err(InitError::at(InitStep::Tcxo))?;
    }
    radio
        .force_ldro(conf.force_ldro)
        .map_err(InitError::at(InitStep::Ldro))?;
    radio
        .set_rx_boosted_gain_mode(conf.rx_boosted_gain)
        .map_err(InitError::at(InitStep::RxGain))?;
    if let Some(len) = conf.implicit_header_len {
        radio
            .implicit_header(len)
            .map_err(InitError::at(InitStep::ImplicitHeader))?;
    }
    Ok(())
}

fn report<W: fmt::Write>(
    console: &mut Console<W>,
    res: Result<(), InitError>,
) -> Result<(), InitError> {
    match res {
        Ok(()) => console.success(),
        Err(err) => {
            error!("bring-up failed at {}, code {}", err.step, err.code);
            console.failed(err.code);
        }
    }
    res
}

/// Wait for one packet and print what came of it
pub fn receive_once<R, W>(radio: &mut R, console: &mut Console<W>) -> ReceiveStatus
where
    R: Radio,
    W: fmt::Write,
{
    console.waiting();
    let status = radio.receive();
    match &status {
        ReceiveStatus::Success(packet) => {
            console.success();
            console.packet(packet);
        }
        ReceiveStatus::Timeout => console.timeout(),
        ReceiveStatus::CrcMismatch => console.crc_error(),
        ReceiveStatus::Other(code) => {
            warn!("receive failed, code {}", code);
            console.failed(*code);
        }
    }
    status
}

/// Bring the radio up, then receive forever. Only returns when the
/// bring-up failed.
pub fn run<R, W>(
    radio: &mut R,
    console: &mut Console<W>,
    conf: &RadioConfig,
    rf_switch: RfSwitchTable,
) -> InitError
where
    R: Radio,
    W: fmt::Write,
{
    if let Err(err) = setup(radio, console, conf, rf_switch) {
        return err;
    }
    loop {
        receive_once(radio, console);
    }
}
