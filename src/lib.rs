//! Blocking LoRa receiver for the sub-GHz radio of the STM32WL, an
//! SX126x behind an internal SPI bus.
//!
//! [`receiver::run`] brings the radio up from a [`RadioConfig`] and then
//! waits for packets forever, printing each outcome to a [`Console`].
//! The [`SX126x`] driver only needs `embedded-hal` 1.0 traits, so all of
//! this runs on the host in tests.
#![cfg_attr(not(test), no_std)]

// This must go first, so the macros are visible in the other modules
#[macro_use]
mod fmt;

pub mod conf;
pub mod console;
pub mod op;
pub mod receiver;
pub mod reg;
pub mod rfswitch;
pub mod sx;

pub use conf::{Config, RadioConfig};
pub use console::Console;
pub use receiver::{InitError, Radio, ReceiveStatus, ReceivedPacket};
pub use rfswitch::{RfMode, RfSwitchTable};
pub use sx::err::{StatusCode, SxError};
pub use sx::SX126x;
