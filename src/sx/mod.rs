pub mod err;
mod radio;

use embedded_hal::digital::InputPin;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::Operation;
use embedded_hal::spi::SpiDevice;

use crate::conf::{Config, ConfigError, TCXO_DELAY_US};
use crate::op::modulation::lora::LoraModParams;
use crate::op::packet::lora::{LoRaHeaderType, LoRaInvertIq, LoRaPacketParams};
use crate::op::*;
use crate::receiver::{Payload, ReceivedPacket};
use crate::reg::*;
use crate::rfswitch::{RfMode, RfSwitch, RfSwitchTable, RF_SWITCH_PINS};

use self::err::{PinError, SpiError, SxError};

type Pins<TNRST, TBUSY> = (TNRST, TBUSY);

const NOP: u8 = 0x00;

/// Low time of NRESET; the datasheet asks for at least 100 µs
const RESET_NS: u32 = 200_000;
/// Polling period of the busy line
const BUSY_POLL_NS: u32 = 1_000;
/// Busy line polls before giving up, about 100 ms
const BUSY_POLLS: u32 = 100_000;
/// Polling period of the IRQ status while receiving
const IRQ_POLL_NS: u32 = 1_000_000;
/// Length of the receive window, in symbols
const RX_TIMEOUT_SYMBOLS: u32 = 100;
/// Registers the retention list can hold
const RETENTION_SLOTS: usize = 4;
/// Slack granted on top of the radio's own RX timeout before the
/// driver stops waiting for an IRQ
const RX_GUARD_MS: u32 = 100;

/// Wrapper around the sub-GHz radio of an STM32WL, a Semtech SX1262
/// with an external RF switch
pub struct SX126x<TSPI, TNRST, TBUSY, TCTRL> {
    spi: TSPI,
    nrst_pin: TNRST,
    busy_pin: TBUSY,
    rf_switch: RfSwitch<TCTRL>,
    mod_params: LoraModParams,
    packet_params: LoRaPacketParams,
}

impl<TSPI, TNRST, TBUSY, TCTRL, TSPIERR, TPINERR> SX126x<TSPI, TNRST, TBUSY, TCTRL>
where
    TPINERR: core::fmt::Debug,
    TSPI: SpiDevice<Error = TSPIERR>,
    TNRST: OutputPin<Error = TPINERR>,
    TBUSY: InputPin<Error = TPINERR>,
    TCTRL: OutputPin<Error = TPINERR>,
{
    // Create a new SX126x
    pub fn new(
        spi: TSPI,
        pins: Pins<TNRST, TBUSY>,
        rf_ctrl_pins: [TCTRL; RF_SWITCH_PINS],
    ) -> Self {
        let (nrst_pin, busy_pin) = pins;
        Self {
            spi,
            nrst_pin,
            busy_pin,
            rf_switch: RfSwitch::new(rf_ctrl_pins),
            mod_params: LoraModParams::default(),
            packet_params: LoRaPacketParams::default(),
        }
    }

    /// Tell the driver which RF switch pins to drive in which mode.
    /// Has to be done before [`SX126x::init`], which picks the power
    /// amplifier based on the modes the board supports.
    pub fn set_rf_switch_table(&mut self, table: RfSwitchTable) {
        self.rf_switch.set_table(table);
    }

    // Initialize and configure the SX126x using the provided Config
    pub fn init(&mut self, conf: Config) -> Result<(), SxError<TSPIERR, TPINERR>> {
        // Reset the sx
        self.reset()?;
        self.wait_on_busy()?;

        // 1. If not in STDBY_RC mode, then go to this mode with the command SetStandby(...)
        self.set_standby(StandbyConfig::StbyRc)?;
        self.wait_on_busy()?;
        let status = self.get_status()?;
        if !status.in_standby() {
            error!("radio did not enter standby, status {}", u8::from(status));
            return Err(SxError::ChipNotFound);
        }

        self.set_regulator_mode(conf.regulator_mode)?;
        self.wait_on_busy()?;

        if let Some((tcxo_voltage, tcxo_delay)) = conf.tcxo_opts {
            self.set_dio3_as_tcxo_ctrl(tcxo_voltage, tcxo_delay)?;
            self.wait_on_busy()?;
        }

        // Calibrate
        self.calibrate(conf.calib_param)?;
        self.wait_on_busy()?;

        // 2. Define the protocol (LoRa® or FSK) with the command SetPacketType(...)
        self.set_packet_type(conf.packet_type)?;
        self.wait_on_busy()?;

        self.set_buffer_base_address(0x00, 0x00)?;
        self.wait_on_busy()?;

        self.set_rf_mode(RfMode::Idle)?;

        // 3. Define the RF frequency with the command SetRfFrequency(...)
        self.calibrate_image(CalibImageFreq::from_rf_frequency(conf.rf_frequency))?;
        self.wait_on_busy()?;
        self.set_rf_frequency(conf.rf_freq)?;
        self.wait_on_busy()?;

        // 4. and 5. Power amplifier, over current protection, output power
        self.set_output_power(conf.tx_power_dbm)?;

        // 6. Define the modulation parameter according to the chosen protocol
        self.mod_params = conf.mod_params;
        self.set_mod_params(self.mod_params.into())?;
        self.wait_on_busy()?;

        // 7. Define the frame format
        self.packet_params = conf.packet_params;
        self.apply_packet_params()?;

        // 8. Configure DIO and IRQ
        self.set_dio_irq_params(
            conf.dio1_irq_mask,
            conf.dio1_irq_mask,
            IrqMask::none(),
            IrqMask::none(),
        )?;
        self.wait_on_busy()?;

        // 9. Define Sync Word value
        self.set_sync_word(conf.sync_word)?;
        self.wait_on_busy()?;

        info!("radio up at {} Hz", conf.rf_frequency);
        Ok(())
    }

    /// Switch DIO3 to a new TCXO supply voltage and recalibrate on it
    pub fn set_tcxo(&mut self, volts: f32) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let voltage = TcxoVoltage::from_volts(volts).ok_or(ConfigError::InvalidTcxoVoltage)?;

        self.set_standby(StandbyConfig::StbyRc)?;
        self.wait_on_busy()?;
        self.clear_device_errors()?;
        self.wait_on_busy()?;

        self.set_dio3_as_tcxo_ctrl(voltage, TcxoDelay::from_us(TCXO_DELAY_US))?;
        self.wait_on_busy()?;
        self.calibrate(CalibParam::all())?;
        self.wait_on_busy()?;

        if self.get_device_errors()?.xosc_start_err() {
            error!("oscillator failed to start on the TCXO");
            return Err(SxError::XoscStart);
        }
        Ok(())
    }

    /// Turn low data rate optimization on or off, overriding the choice
    /// made from the symbol time
    pub fn force_ldro(&mut self, enable: bool) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.mod_params = self.mod_params.set_low_dr_opt(enable);
        self.set_mod_params(self.mod_params.into())?;
        self.wait_on_busy()
    }

    /// Select boosted or power saving LNA gain. The choice is added to
    /// the retention list so it survives warm-start sleep.
    pub fn set_rx_boosted_gain_mode(
        &mut self,
        boosted: bool,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let gain = if boosted {
            RxGain::Boosted
        } else {
            RxGain::PowerSaving
        };
        self.set_rx_gain(gain)?;
        self.wait_on_busy()?;

        self.retain_register(Register::RxGain)
    }

    /// Receive fixed length packets of `payload_len` bytes without a
    /// LoRa® header
    pub fn implicit_header(&mut self, payload_len: u8) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.packet_params = self
            .packet_params
            .set_header_type(LoRaHeaderType::FixedLen)
            .set_payload_len(payload_len);
        self.apply_packet_params()
    }

    /// Receive a single packet, blocking until it arrives or the receive
    /// window of 100 symbols closes.
    pub fn receive(&mut self) -> Result<ReceivedPacket, SxError<TSPIERR, TPINERR>> {
        self.set_standby(StandbyConfig::StbyRc)?;
        self.wait_on_busy()?;

        let timeout_ms = self.mod_params.symbol_time_us() * RX_TIMEOUT_SYMBOLS / 1000;
        self.clear_irq_status(IrqMask::all())?;
        self.wait_on_busy()?;

        let irq = self.listen(timeout_ms);

        // Leave RX whatever the outcome
        let standby = self
            .set_standby(StandbyConfig::StbyRc)
            .and_then(|_| self.wait_on_busy());
        self.set_rf_mode(RfMode::Idle)?;

        let irq = irq?;
        standby?;
        self.clear_irq_status(IrqMask::all())?;
        self.wait_on_busy()?;

        let irq = match irq {
            Some(irq) if !irq.timeout() => irq,
            timed_out => {
                if timed_out.is_none() {
                    warn!("no RX IRQ within {} ms", timeout_ms + RX_GUARD_MS);
                }
                if self.packet_params.header_type() == LoRaHeaderType::FixedLen {
                    self.stop_rtc()?;
                }
                return Err(SxError::RxTimeout);
            }
        };

        if irq.crc_err() || irq.header_error() {
            debug!("dropping packet, irq status {}", u16::from(irq));
            return Err(SxError::CrcMismatch);
        }

        let buffer_status = self.get_rx_buffer_status()?;
        self.wait_on_busy()?;
        let payload_len = buffer_status.payload_length_rx() as usize;

        let mut payload = Payload::new();
        // Payload holds 255 bytes, every u8 length fits
        let _ = payload.resize_default(payload_len);
        if payload_len > 0 {
            self.read_buffer(buffer_status.rx_start_buffer_pointer(), &mut payload)?;
            self.wait_on_busy()?;
        }

        let packet_status = self.get_packet_status()?;
        self.wait_on_busy()?;

        debug!(
            "received {} bytes, rssi {} snr {}",
            payload_len,
            packet_status.rssi_pkt(),
            packet_status.snr_pkt()
        );
        Ok(ReceivedPacket {
            payload,
            rssi: packet_status.rssi_pkt(),
            snr: packet_status.snr_pkt(),
        })
    }

    /// Set the LoRa Sync word
    /// Use 0x3444 for public networks like TTN
    /// Use 0x1424 for private networks
    pub fn set_sync_word(&mut self, sync_word: u16) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.write_register(Register::LoRaSyncWordMsb, &sync_word.to_be_bytes())
    }

    /// Set the LNA gain used in RX
    pub fn set_rx_gain(&mut self, gain: RxGain) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.write_register(Register::RxGain, &[gain as u8])
    }

    /// Set the modem packet type, which can be either GFSK of LoRa
    /// Note: only LoRa is used by this crate
    pub fn set_packet_type(
        &mut self,
        packet_type: PacketType,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x8A, packet_type as u8])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Put the modem in standby mode
    pub fn set_standby(
        &mut self,
        standby_config: StandbyConfig,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x80, standby_config as u8])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Select LDO or DC-DC regulation
    pub fn set_regulator_mode(
        &mut self,
        mode: RegulatorMode,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x96, mode as u8])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Get the current status of the modem
    pub fn get_status(&mut self) -> Result<Status, SxError<TSPIERR, TPINERR>> {
        let mut result = [0xC0, NOP];
        self.spi
            .transfer_in_place(&mut result)
            .map_err(SpiError::Transfer)?;

        Ok(result[1].into())
    }

    /// Calibrate image
    pub fn calibrate_image(
        &mut self,
        freq: CalibImageFreq,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let freq: [u8; 2] = freq.into();
        let mut ops = [Operation::Write(&[0x98]), Operation::Write(&freq)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Calibrate modem
    pub fn calibrate(&mut self, calib_param: CalibParam) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x89, calib_param.into()])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Write data into a register
    pub fn write_register(
        &mut self,
        register: Register,
        data: &[u8],
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let start_addr = u16::from(register).to_be_bytes();
        let mut ops = [
            Operation::Write(&[0x0D]),
            Operation::Write(&start_addr),
            Operation::Write(data),
        ];

        self.spi.transaction(&mut ops).map_err(SpiError::Write)?;
        Ok(())
    }

    /// Read data from a register
    pub fn read_register(
        &mut self,
        register: Register,
        result: &mut [u8],
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        debug_assert!(!result.is_empty());
        let start_addr = u16::from(register).to_be_bytes();

        let mut ops = [
            Operation::Write(&[0x1D]),
            Operation::Write(&start_addr),
            Operation::Write(&[NOP]),
            Operation::Read(result),
        ];

        self.spi.transaction(&mut ops).map_err(SpiError::Transfer)?;
        Ok(())
    }

    /// Read data from the data from the defined offset
    pub fn read_buffer(
        &mut self,
        offset: u8,
        result: &mut [u8],
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let header = [0x1E, offset, NOP];
        let mut ops = [Operation::Write(&header), Operation::Read(result)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Transfer)
            .map_err(Into::into)
    }

    pub fn get_packet_status(&mut self) -> Result<PacketStatus, SxError<TSPIERR, TPINERR>> {
        let header = [0x14, NOP];
        let mut result = [NOP; 3];
        let mut ops = [Operation::Write(&header), Operation::Read(&mut result)];
        self.spi.transaction(&mut ops).map_err(SpiError::Transfer)?;

        Ok(result.into())
    }

    /// Configure the dio3 pin as TCXO control switch
    pub fn set_dio3_as_tcxo_ctrl(
        &mut self,
        tcxo_voltage: TcxoVoltage,
        tcxo_delay: TcxoDelay,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let header = [0x97, tcxo_voltage as u8];
        let tcxo_delay: [u8; 3] = tcxo_delay.into();
        let mut ops = [Operation::Write(&header), Operation::Write(&tcxo_delay)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Clear device error register
    pub fn clear_device_errors(&mut self) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x07, NOP, NOP])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Get current device errors
    pub fn get_device_errors(&mut self) -> Result<DeviceErrors, SxError<TSPIERR, TPINERR>> {
        let mut result = [0x17, NOP, NOP, NOP];
        self.spi
            .transfer_in_place(&mut result)
            .map_err(SpiError::Transfer)?;
        Ok(DeviceErrors::from(u16::from_be_bytes([result[2], result[3]])))
    }

    /// Reset the device py pulling nrst low for a while
    pub fn reset(&mut self) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.nrst_pin.set_low().map_err(PinError::Output)?;
        // 8.1: The pin should be held low for typically 100 μs for the Reset to happen
        self.delay_ns(RESET_NS)?;
        self.nrst_pin
            .set_high()
            .map_err(PinError::Output)
            .map_err(Into::into)
    }

    /// Drive the RF switch for `mode`
    pub fn set_rf_mode(&mut self, mode: RfMode) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.rf_switch
            .set_mode(mode)
            .map_err(PinError::Output)
            .map_err(Into::into)
    }

    /// Configure IRQ
    pub fn set_dio_irq_params(
        &mut self,
        irq_mask: IrqMask,
        dio1_mask: IrqMask,
        dio2_mask: IrqMask,
        dio3_mask: IrqMask,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let irq = (Into::<u16>::into(irq_mask)).to_be_bytes();
        let dio1 = (Into::<u16>::into(dio1_mask)).to_be_bytes();
        let dio2 = (Into::<u16>::into(dio2_mask)).to_be_bytes();
        let dio3 = (Into::<u16>::into(dio3_mask)).to_be_bytes();
        let mut ops = [
            Operation::Write(&[0x08]),
            Operation::Write(&irq),
            Operation::Write(&dio1),
            Operation::Write(&dio2),
            Operation::Write(&dio3),
        ];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Get the current IRQ status
    pub fn get_irq_status(&mut self) -> Result<IrqStatus, SxError<TSPIERR, TPINERR>> {
        let mut status = [NOP, NOP, NOP];
        let mut ops = [Operation::Write(&[0x12]), Operation::Read(&mut status)];
        self.spi.transaction(&mut ops).map_err(SpiError::Transfer)?;
        let irq_status: [u8; 2] = [status[1], status[2]];
        Ok(u16::from_be_bytes(irq_status).into())
    }

    /// Clear the IRQ status
    pub fn clear_irq_status(&mut self, mask: IrqMask) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let mask = Into::<u16>::into(mask).to_be_bytes();
        let mut ops = [Operation::Write(&[0x02]), Operation::Write(&mask)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Put the device in RX mode
    pub fn set_rx(&mut self, timeout: RxTxTimeout) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let mut buf = [0x82u8; 4];
        let timeout: [u8; 3] = timeout.into();
        buf[1..].copy_from_slice(&timeout);

        self.spi
            .write(&buf)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Set packet parameters
    pub fn set_packet_params(
        &mut self,
        params: PacketParams,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let params: [u8; 9] = params.into();
        let mut ops = [Operation::Write(&[0x8C]), Operation::Write(&params)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Set modulation parameters
    pub fn set_mod_params(&mut self, params: ModParams) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let params: [u8; 8] = params.into();
        let mut ops = [Operation::Write(&[0x8B]), Operation::Write(&params)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Set TX parameters
    pub fn set_tx_params(&mut self, params: TxParams) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let params: [u8; 2] = params.into();
        let mut ops = [Operation::Write(&[0x8E]), Operation::Write(&params)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Set RF frequency. This writes the passed rf_freq directly to the modem.
    /// Use crate::conf::calc_rf_freq to calulate the correct value based
    /// On the XTAL frequency and the desired RF frequency
    pub fn set_rf_frequency(&mut self, rf_freq: u32) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let rf_freq = rf_freq.to_be_bytes();
        let mut ops = [Operation::Write(&[0x86]), Operation::Write(&rf_freq)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Set Power Amplifier configuration
    pub fn set_pa_config(&mut self, pa_config: PaConfig) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let pa_config: [u8; 4] = pa_config.into();
        let mut ops = [Operation::Write(&[0x95]), Operation::Write(&pa_config)];
        self.spi
            .transaction(&mut ops)
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Configure the base addresses in the buffer
    pub fn set_buffer_base_address(
        &mut self,
        tx_base_addr: u8,
        rx_base_addr: u8,
    ) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .write(&[0x8F, tx_base_addr, rx_base_addr])
            .map_err(SpiError::Write)
            .map_err(Into::into)
    }

    /// Get Rx buffer status, containing the length of the last received packet
    /// and the address of the first byte received.
    pub fn get_rx_buffer_status(&mut self) -> Result<RxBufferStatus, SxError<TSPIERR, TPINERR>> {
        let mut result = [0x13, NOP, NOP, NOP];
        self.spi
            .transfer_in_place(&mut result)
            .map_err(SpiError::Transfer)?;
        Ok([result[2], result[3]].into())
    }

    /// Wait for the busy line to go low, giving up after about 100 ms
    pub fn wait_on_busy(&mut self) -> Result<(), SxError<TSPIERR, TPINERR>> {
        for _ in 0..BUSY_POLLS {
            // Busy only rises some 600 ns after a command
            self.delay_ns(BUSY_POLL_NS)?;
            if !self.busy_pin.is_high().map_err(PinError::Input)? {
                return Ok(());
            }
        }
        error!("busy line stuck high");
        Err(SxError::BusyTimeout)
    }

    /// Switch to RX and poll until the radio reports the end of the
    /// receive window, or the software guard runs out
    fn listen(&mut self, timeout_ms: u32) -> Result<Option<IrqStatus>, SxError<TSPIERR, TPINERR>> {
        self.set_rf_mode(RfMode::Rx)?;
        self.set_rx(RxTxTimeout::from_ms(timeout_ms))?;
        self.wait_on_busy()?;
        debug!("listening for up to {} ms", timeout_ms);

        self.wait_on_irq(IrqMask::rx_finished(), timeout_ms + RX_GUARD_MS)
    }

    /// Add `register` to the retention list, unless it is already there
    /// or the list is full
    fn retain_register(&mut self, register: Register) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let mut list = [NOP; 1 + 2 * RETENTION_SLOTS];
        self.read_register(Register::RetentionListCount, &mut list)?;
        self.wait_on_busy()?;

        let count = usize::from(list[0]).min(RETENTION_SLOTS);
        let addr = u16::from(register).to_be_bytes();
        if list[1..1 + 2 * count].chunks_exact(2).any(|entry| entry == addr) {
            return Ok(());
        }
        if count == RETENTION_SLOTS {
            warn!("retention list full, {} not retained", u16::from(register));
            return Ok(());
        }

        list[0] = count as u8 + 1;
        list[1 + 2 * count..3 + 2 * count].copy_from_slice(&addr);
        self.write_register(Register::RetentionListCount, &list)?;
        self.wait_on_busy()
    }

    /// Pick the power amplifier for `power_dbm`. The low power PA is
    /// preferred when the board's RF switch can route it.
    fn select_pa(&self, power_dbm: i8) -> Result<PaSel, ConfigError> {
        let table = self.rf_switch.table();
        let routed = |mode| table.map_or(true, |table| table.supports(mode));

        if PaSel::Lp.power_range().contains(&power_dbm) && routed(RfMode::TxLp) {
            Ok(PaSel::Lp)
        } else if PaSel::Hp.power_range().contains(&power_dbm) && routed(RfMode::TxHp) {
            Ok(PaSel::Hp)
        } else {
            Err(ConfigError::InvalidOutputPower)
        }
    }

    fn set_output_power(&mut self, power_dbm: i8) -> Result<(), SxError<TSPIERR, TPINERR>> {
        let pa_sel = self.select_pa(power_dbm)?;
        self.set_pa_config(PaConfig::for_pa(pa_sel))?;
        self.wait_on_busy()?;
        // SetPaConfig resets the OCP level
        self.write_register(Register::OcpConfiguration, &[pa_sel.ocp()])?;
        self.wait_on_busy()?;
        self.set_tx_params(TxParams::default().set_power_dbm(power_dbm))?;
        self.wait_on_busy()
    }

    /// Write the packet params, applying the IQ polarity fix of datasheet 15.4
    fn apply_packet_params(&mut self) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.set_packet_params(self.packet_params.into())?;
        self.wait_on_busy()?;

        let mut iq = [NOP];
        self.read_register(Register::IqPolaritySetup, &mut iq)?;
        self.wait_on_busy()?;
        iq[0] = match self.packet_params.invert_iq() {
            LoRaInvertIq::Standard => iq[0] | 0x04,
            LoRaInvertIq::Inverted => iq[0] & !0x04,
        };
        self.write_register(Register::IqPolaritySetup, &iq)?;
        self.wait_on_busy()
    }

    /// Stop the RTC after an RX timeout in implicit header mode, or it
    /// keeps firing timeouts (datasheet 15.3)
    fn stop_rtc(&mut self) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.write_register(Register::RtcControl, &[0x00])?;
        self.wait_on_busy()?;
        let mut event_mask = [NOP];
        self.read_register(Register::EventMask, &mut event_mask)?;
        self.wait_on_busy()?;
        self.write_register(Register::EventMask, &[event_mask[0] | 0x02])?;
        self.wait_on_busy()
    }

    /// Poll the IRQ status until one of `mask` is raised, for at most
    /// `limit_ms` milliseconds
    fn wait_on_irq(
        &mut self,
        mask: IrqMask,
        limit_ms: u32,
    ) -> Result<Option<IrqStatus>, SxError<TSPIERR, TPINERR>> {
        for _ in 0..limit_ms {
            let irq = self.get_irq_status()?;
            if irq.any(mask) {
                return Ok(Some(irq));
            }
            self.delay_ns(IRQ_POLL_NS)?;
        }
        Ok(None)
    }

    fn delay_ns(&mut self, ns: u32) -> Result<(), SxError<TSPIERR, TPINERR>> {
        self.spi
            .transaction(&mut [Operation::DelayNs(ns)])
            .map_err(SpiError::Transfer)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests;
