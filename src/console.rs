//! Human readable status lines, written to any [`core::fmt::Write`] sink.
//! On the board that is USART2.

use core::fmt;

use crate::receiver::ReceivedPacket;

/// Prefix of every line that introduces a step
pub const TAG: &str = "[STM32WL]";

#[macro_export]
macro_rules! uprint {
    ($serial:expr, $($arg:tt)*) => {
        core::fmt::Write::write_fmt($serial, format_args!($($arg)*)).ok()
    };
}

#[macro_export]
macro_rules! uprintln {
    ($serial:expr, $fmt:expr) => {
        $crate::uprint!($serial, concat!($fmt, "\r\n"))
    };
    ($serial:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::uprint!($serial, concat!($fmt, "\r\n"), $($arg)*)
    };
}

pub struct Console<W> {
    out: W,
}

impl<W: fmt::Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn release(self) -> W {
        self.out
    }

    pub fn initializing(&mut self) {
        uprint!(&mut self.out, "{} Initializing ... ", TAG);
    }

    pub fn configuring(&mut self) {
        uprint!(&mut self.out, "{} Configuring ... ", TAG);
    }

    pub fn waiting(&mut self) {
        uprint!(&mut self.out, "{} Waiting for incoming transmission ... ", TAG);
    }

    pub fn success(&mut self) {
        uprintln!(&mut self.out, "success!");
    }

    pub fn failed(&mut self, code: i16) {
        uprintln!(&mut self.out, "failed, code {}", code);
    }

    pub fn timeout(&mut self) {
        uprintln!(&mut self.out, "timeout!");
    }

    pub fn crc_error(&mut self) {
        uprintln!(&mut self.out, "CRC error!");
    }

    /// Payload, RSSI and SNR of a received packet, one line each
    pub fn packet(&mut self, packet: &ReceivedPacket) {
        uprint!(&mut self.out, "{} Data:\t\t", TAG);
        self.text(&packet.payload);
        uprintln!(&mut self.out, "");
        uprintln!(&mut self.out, "{} RSSI:\t\t{} dBm", TAG, packet.rssi);
        uprintln!(&mut self.out, "{} SNR:\t\t{} dB", TAG, packet.snr);
    }

    /// Payload bytes as text, bytes that are not UTF-8 as `\xNN`
    fn text(&mut self, bytes: &[u8]) {
        for chunk in bytes.utf8_chunks() {
            uprint!(&mut self.out, "{}", chunk.valid());
            for b in chunk.invalid() {
                uprint!(&mut self.out, "\\x{:02X}", b);
            }
        }
    }
}
