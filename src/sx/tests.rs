use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin, PinState};
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

use super::err::{StatusCode, SxError};
use super::SX126x;
use crate::conf::{Config, ConfigError, RadioConfig, RIGEL, RIGEL_RF_SWITCH};
use crate::receiver::Radio;

#[derive(Default)]
struct SpiLog {
    /// Bytes written per transaction, delay-only transactions left out
    frames: Vec<Vec<u8>>,
    /// Bytes clocked back for the next transactions starting with an opcode
    responses: HashMap<u8, VecDeque<Vec<u8>>>,
    delay_ns: u64,
    /// Busy goes high for good once a frame with this opcode is sent
    busy_after: Option<u8>,
}

#[derive(Clone, Default)]
struct FakeSpi(Rc<RefCell<SpiLog>>);

impl FakeSpi {
    fn respond(&self, opcode: u8, bytes: &[u8]) {
        self.0
            .borrow_mut()
            .responses
            .entry(opcode)
            .or_default()
            .push_back(bytes.to_vec());
    }

    fn frames(&self) -> Vec<Vec<u8>> {
        self.0.borrow().frames.clone()
    }

    fn opcodes(&self) -> Vec<u8> {
        self.frames().iter().map(|frame| frame[0]).collect()
    }

    fn has_frame(&self, frame: &[u8]) -> bool {
        self.frames().iter().any(|f| f == frame)
    }

    fn clear(&self) {
        self.0.borrow_mut().frames.clear();
    }

    fn stick_busy_after(&self, opcode: u8) {
        self.0.borrow_mut().busy_after = Some(opcode);
    }

    fn busy(&self) -> bool {
        let log = self.0.borrow();
        log.busy_after
            .is_some_and(|opcode| log.frames.iter().any(|frame| frame[0] == opcode))
    }
}

impl ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut log = self.0.borrow_mut();

        let mut frame = Vec::new();
        for op in operations.iter() {
            match op {
                Operation::Write(buf) => frame.extend_from_slice(buf),
                Operation::Transfer(_, write) => frame.extend_from_slice(write),
                Operation::TransferInPlace(buf) => frame.extend_from_slice(buf),
                Operation::Read(_) => {}
                Operation::DelayNs(ns) => log.delay_ns += u64::from(*ns),
            }
        }

        // Unscripted GetStatus answers with STDBY_RC
        let response = match frame.first() {
            Some(&opcode) => log
                .responses
                .get_mut(&opcode)
                .and_then(VecDeque::pop_front)
                .or_else(|| (opcode == 0xC0).then(|| vec![0x00, 0x22]))
                .unwrap_or_default(),
            None => Vec::new(),
        };
        let mut bytes = response.into_iter().chain(std::iter::repeat(0));
        for op in operations.iter_mut() {
            let buf: &mut [u8] = match op {
                Operation::Read(buf) => &mut **buf,
                Operation::Transfer(read, _) => &mut **read,
                Operation::TransferInPlace(buf) => &mut **buf,
                _ => continue,
            };
            for b in buf.iter_mut() {
                *b = bytes.next().unwrap_or(0);
            }
        }

        if !frame.is_empty() {
            log.frames.push(frame);
        }
        Ok(())
    }
}

/// Busy line that is stuck high, or follows the SPI log
struct FakeBusy {
    stuck: bool,
    spi: FakeSpi,
}

impl PinErrorType for FakeBusy {
    type Error = Infallible;
}

impl InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.stuck || self.spi.busy())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Output pin that remembers every state it was driven to
#[derive(Clone, Default)]
struct TracePin(Rc<RefCell<Vec<PinState>>>);

impl TracePin {
    fn history(&self) -> Vec<PinState> {
        self.0.borrow().clone()
    }
}

impl PinErrorType for TracePin {
    type Error = Infallible;
}

impl OutputPin for TracePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(PinState::High);
        Ok(())
    }
}

struct Bench {
    sx: SX126x<FakeSpi, TracePin, FakeBusy, TracePin>,
    spi: FakeSpi,
    nrst: TracePin,
    ctrl: [TracePin; 3],
}

fn bench(busy: bool) -> Bench {
    let spi = FakeSpi::default();
    let nrst = TracePin::default();
    let ctrl: [TracePin; 3] = Default::default();
    let busy = FakeBusy {
        stuck: busy,
        spi: spi.clone(),
    };
    let mut sx = SX126x::new(spi.clone(), (nrst.clone(), busy), ctrl.clone());
    sx.set_rf_switch_table(RIGEL_RF_SWITCH);
    Bench {
        sx,
        spi,
        nrst,
        ctrl,
    }
}

fn ready(radio: &RadioConfig) -> Bench {
    let mut bench = bench(false);
    bench.sx.init(Config::try_from(radio).unwrap()).unwrap();
    bench.spi.clear();
    bench
}

const INIT_OPCODES: [u8; 18] = [
    0x80, 0xC0, 0x96, 0x97, 0x89, 0x8A, 0x8F, 0x98, 0x86, 0x95, 0x0D, 0x8E, 0x8B, 0x8C, 0x1D, 0x0D,
    0x08, 0x0D,
];

fn last_states(ctrl: &[TracePin; 3]) -> Vec<Option<PinState>> {
    ctrl.iter().map(|pin| pin.history().last().copied()).collect()
}

#[test]
fn init_walks_the_configuration_sequence() {
    let mut bench = bench(false);
    bench.sx.init(Config::try_from(&RIGEL).unwrap()).unwrap();

    assert_eq!(bench.nrst.history(), [PinState::Low, PinState::High]);
    assert_eq!(bench.spi.opcodes(), INIT_OPCODES);

    let frames = bench.spi.frames();
    assert_eq!(frames[0], [0x80, 0x00]);
    assert_eq!(frames[2], [0x96, 0x01]);
    assert_eq!(frames[3], [0x97, 0x06, 0x00, 0x01, 0x3F]);
    assert_eq!(frames[4], [0x89, 0x7F]);
    assert_eq!(frames[5], [0x8A, 0x01]);
    assert_eq!(frames[7], [0x98, 0xE1, 0xE9]);
    assert_eq!(frames[8], [0x86, 0x39, 0x30, 0x00, 0x00]);
    // 10 dBm goes through the low power PA
    assert_eq!(frames[9], [0x95, 0x04, 0x00, 0x01, 0x01]);
    assert_eq!(frames[10], [0x0D, 0x08, 0xE7, 0x18]);
    assert_eq!(frames[12], [0x8B, 0x0C, 0x08, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(
        frames[13],
        [0x8C, 0x00, 0x08, 0x00, 0xFF, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(frames[15], [0x0D, 0x07, 0x36, 0x04]);
    assert_eq!(
        frames[16],
        [0x08, 0x02, 0x62, 0x02, 0x62, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(frames[17], [0x0D, 0x07, 0x40, 0x14, 0x24]);

    assert_eq!(
        last_states(&bench.ctrl),
        [Some(PinState::Low), Some(PinState::Low), Some(PinState::Low)]
    );
}

#[test]
fn begin_validates_before_touching_the_radio() {
    let mut bench = bench(false);
    let radio = RadioConfig {
        bandwidth_khz: 11.0,
        ..RIGEL
    };
    let res = Radio::begin(&mut bench.sx, &radio);
    assert_eq!(res, Err(SxError::Config(ConfigError::InvalidBandwidth)));
    assert_eq!(res.unwrap_err().code(), -8);
    assert!(bench.spi.frames().is_empty());
    assert!(bench.nrst.history().is_empty());
}

#[test]
fn begin_runs_init() {
    let mut bench = bench(false);
    Radio::begin(&mut bench.sx, &RIGEL).unwrap();
    assert_eq!(bench.nrst.history(), [PinState::Low, PinState::High]);
    assert_eq!(bench.spi.opcodes(), INIT_OPCODES);
}

#[test]
fn high_power_needs_the_high_power_pa() {
    let mut bench = bench(false);
    let radio = RadioConfig {
        power_dbm: 20,
        ..RIGEL
    };
    bench.sx.init(Config::try_from(&radio).unwrap()).unwrap();

    assert!(bench.spi.has_frame(&[0x95, 0x04, 0x07, 0x00, 0x01]));
    assert!(bench.spi.has_frame(&[0x0D, 0x08, 0xE7, 0x38]));
    assert!(bench.spi.has_frame(&[0x8E, 20, 0x04]));
}

#[test]
fn missing_chip_is_reported() {
    let mut bench = bench(false);
    bench.spi.respond(0xC0, &[0x00, 0x00]);
    let res = bench.sx.init(Config::try_from(&RIGEL).unwrap());
    assert_eq!(res, Err(SxError::ChipNotFound));
    assert_eq!(SxError::<Infallible, Infallible>::ChipNotFound.code(), -2);
}

#[test]
fn stuck_busy_line_times_out() {
    let mut bench = bench(true);
    let res = bench.sx.init(Config::try_from(&RIGEL).unwrap());
    assert_eq!(res, Err(SxError::BusyTimeout));
    assert!(bench.spi.frames().is_empty());
    assert!(bench.spi.0.borrow().delay_ns >= 100_000_000);
}

#[test]
fn receive_reads_payload_and_packet_status() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x12, &[0x00, 0x00, 0x02]);
    bench.spi.respond(0x13, &[0x00, 0x00, 0x05, 0x80]);
    bench.spi.respond(0x1E, b"hello");
    bench.spi.respond(0x14, &[84, 28, 90]);

    let packet = bench.sx.receive().unwrap();
    assert_eq!(&packet.payload[..], b"hello");
    assert_eq!(packet.rssi, -42.0);
    assert_eq!(packet.snr, 7.0);

    // 100 symbols of 393.2 ms
    assert!(bench.spi.has_frame(&[0x82, 0x26, 0x66, 0x00]));
    assert!(bench.spi.has_frame(&[0x1E, 0x80, 0x00]));

    let ctrl = bench.ctrl[0].history();
    assert!(ctrl.ends_with(&[PinState::High, PinState::Low]));
    assert_eq!(
        last_states(&bench.ctrl),
        [Some(PinState::Low), Some(PinState::Low), Some(PinState::Low)]
    );
}

#[test]
fn busy_after_set_rx_still_leaves_rx() {
    let mut bench = ready(&RIGEL);
    bench.spi.stick_busy_after(0x82);

    assert_eq!(bench.sx.receive(), Err(SxError::BusyTimeout));
    let opcodes = bench.spi.opcodes();
    let set_rx = opcodes.iter().position(|&op| op == 0x82).unwrap();
    assert_eq!(opcodes[set_rx + 1..], [0x80]);
    assert!(bench.ctrl[0].history().contains(&PinState::High));
    assert_eq!(
        last_states(&bench.ctrl),
        [Some(PinState::Low), Some(PinState::Low), Some(PinState::Low)]
    );
}

#[test]
fn empty_packet_skips_buffer_read() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x12, &[0x00, 0x00, 0x02]);
    bench.spi.respond(0x13, &[0x00, 0x00, 0x00, 0x00]);

    let packet = bench.sx.receive().unwrap();
    assert!(packet.payload.is_empty());
    assert!(!bench.spi.opcodes().contains(&0x1E));
}

#[test]
fn crc_error_drops_packet() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x12, &[0x00, 0x00, 0x42]);

    let res = bench.sx.receive();
    assert_eq!(res, Err(SxError::CrcMismatch));
    assert_eq!(res.unwrap_err().code(), -7);
    assert!(!bench.spi.opcodes().contains(&0x1E));
}

#[test]
fn header_error_counts_as_crc_error() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x12, &[0x00, 0x00, 0x20]);
    assert_eq!(bench.sx.receive(), Err(SxError::CrcMismatch));
}

#[test]
fn explicit_header_timeout_leaves_rtc_alone() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x12, &[0x00, 0x02, 0x00]);

    let res = bench.sx.receive();
    assert_eq!(res, Err(SxError::RxTimeout));
    assert_eq!(res.unwrap_err().code(), -6);
    assert!(!bench.spi.has_frame(&[0x0D, 0x09, 0x02, 0x00]));
}

#[test]
fn implicit_header_timeout_stops_rtc() {
    let mut bench = ready(&RIGEL);
    bench.sx.implicit_header(8).unwrap();
    assert!(bench
        .spi
        .has_frame(&[0x8C, 0x00, 0x08, 0x01, 0x08, 0x01, 0x00, 0x00, 0x00, 0x00]));

    bench.spi.clear();
    bench.spi.respond(0x12, &[0x00, 0x02, 0x00]);
    bench.spi.respond(0x1D, &[0x10]);

    assert_eq!(bench.sx.receive(), Err(SxError::RxTimeout));
    assert!(bench.spi.has_frame(&[0x0D, 0x09, 0x02, 0x00]));
    assert!(bench.spi.has_frame(&[0x1D, 0x09, 0x44, 0x00]));
    assert!(bench.spi.has_frame(&[0x0D, 0x09, 0x44, 0x12]));
}

#[test]
fn silent_radio_hits_software_guard() {
    let mut bench = ready(&RadioConfig {
        spreading_factor: 7,
        bandwidth_khz: 125.0,
        ..RIGEL
    });

    assert_eq!(bench.sx.receive(), Err(SxError::RxTimeout));
    // 100 symbols of 1.024 ms plus the guard, polled every ms
    let polls = bench.spi.opcodes().iter().filter(|&&op| op == 0x12).count();
    assert_eq!(polls, 102 + 100);
}

#[test]
fn tcxo_voltage_is_checked() {
    let mut bench = ready(&RIGEL);
    let res = bench.sx.set_tcxo(2.5);
    assert_eq!(res, Err(SxError::Config(ConfigError::InvalidTcxoVoltage)));
    assert_eq!(res.unwrap_err().code(), -19);
    assert!(bench.spi.frames().is_empty());
}

#[test]
fn tcxo_setup_recalibrates() {
    let mut bench = ready(&RIGEL);
    bench.sx.set_tcxo(1.8).unwrap();
    assert_eq!(bench.spi.opcodes(), [0x80, 0x07, 0x97, 0x89, 0x17]);
    assert!(bench.spi.has_frame(&[0x97, 0x02, 0x00, 0x01, 0x3F]));
}

#[test]
fn oscillator_failure_after_tcxo_setup() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x17, &[0x00, 0x00, 0x00, 0x20]);
    let res = bench.sx.set_tcxo(3.0);
    assert_eq!(res, Err(SxError::XoscStart));
    assert_eq!(res.unwrap_err().code(), -707);
}

#[test]
fn boosted_gain_is_retained() {
    let mut bench = ready(&RIGEL);
    bench.sx.set_rx_boosted_gain_mode(true).unwrap();
    assert_eq!(
        bench.spi.frames(),
        [
            vec![0x0D, 0x08, 0xAC, 0x96],
            vec![0x1D, 0x02, 0x9F, 0x00],
            vec![0x0D, 0x02, 0x9F, 0x01, 0x08, 0xAC, 0, 0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn retention_list_keeps_other_registers() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x1D, &[0x01, 0x08, 0xE7]);
    bench.sx.set_rx_boosted_gain_mode(true).unwrap();
    assert!(bench
        .spi
        .has_frame(&[0x0D, 0x02, 0x9F, 0x02, 0x08, 0xE7, 0x08, 0xAC, 0, 0, 0, 0]));
}

#[test]
fn retained_register_is_not_added_twice() {
    let mut bench = ready(&RIGEL);
    bench.spi.respond(0x1D, &[0x01, 0x08, 0xAC]);
    bench.sx.set_rx_boosted_gain_mode(false).unwrap();
    assert_eq!(
        bench.spi.frames(),
        [vec![0x0D, 0x08, 0xAC, 0x94], vec![0x1D, 0x02, 0x9F, 0x00]]
    );
}

#[test]
fn full_retention_list_is_left_alone() {
    let mut bench = ready(&RIGEL);
    bench
        .spi
        .respond(0x1D, &[0x04, 0x08, 0xE7, 0x08, 0xE8, 0x07, 0x36, 0x09, 0x44]);
    bench.sx.set_rx_boosted_gain_mode(true).unwrap();
    assert_eq!(bench.spi.opcodes(), [0x0D, 0x1D]);
}

#[test]
fn ldro_can_be_forced_off() {
    let mut bench = ready(&RIGEL);
    bench.sx.force_ldro(false).unwrap();
    assert_eq!(
        bench.spi.frames(),
        [vec![0x8B, 0x0C, 0x08, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00]]
    );
}
