use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use super::err::{StatusCode, SxError};
use super::SX126x;
use crate::conf::{Config, RadioConfig};
use crate::receiver::{Radio, ReceiveStatus, ReceivedPacket};
use crate::rfswitch::RfSwitchTable;

impl<TSPI, TNRST, TBUSY, TCTRL, TSPIERR, TPINERR> Radio for SX126x<TSPI, TNRST, TBUSY, TCTRL>
where
    TPINERR: core::fmt::Debug,
    TSPI: SpiDevice<Error = TSPIERR>,
    TNRST: OutputPin<Error = TPINERR>,
    TBUSY: InputPin<Error = TPINERR>,
    TCTRL: OutputPin<Error = TPINERR>,
{
    type Error = SxError<TSPIERR, TPINERR>;

    fn set_rf_switch_table(&mut self, table: RfSwitchTable) {
        SX126x::set_rf_switch_table(self, table)
    }

    fn begin(&mut self, conf: &RadioConfig) -> Result<(), Self::Error> {
        let conf = Config::try_from(conf)?;
        self.init(conf)
    }

    fn set_tcxo(&mut self, volts: f32) -> Result<(), Self::Error> {
        SX126x::set_tcxo(self, volts)
    }

    fn force_ldro(&mut self, enable: bool) -> Result<(), Self::Error> {
        SX126x::force_ldro(self, enable)
    }

    fn set_rx_boosted_gain_mode(&mut self, boosted: bool) -> Result<(), Self::Error> {
        SX126x::set_rx_boosted_gain_mode(self, boosted)
    }

    fn implicit_header(&mut self, payload_len: u8) -> Result<(), Self::Error> {
        SX126x::implicit_header(self, payload_len)
    }

    fn receive(&mut self) -> ReceiveStatus {
        SX126x::receive(self).into()
    }
}

impl<TSPIERR, TPINERR> From<Result<ReceivedPacket, SxError<TSPIERR, TPINERR>>> for ReceiveStatus {
    fn from(res: Result<ReceivedPacket, SxError<TSPIERR, TPINERR>>) -> Self {
        match res {
            Ok(packet) => ReceiveStatus::Success(packet),
            Err(SxError::RxTimeout) => ReceiveStatus::Timeout,
            Err(SxError::CrcMismatch) => ReceiveStatus::CrcMismatch,
            Err(err) => ReceiveStatus::Other(err.code()),
        }
    }
}
