//! External RF switch control.
//!
//! Boards built around the STM32WL route the antenna through an RF switch
//! driven by up to three GPIOs. Which pins are high in which radio mode
//! differs per board, so the mapping is described with an [`RfSwitchTable`]
//! and applied by the driver on every mode change.
use embedded_hal::digital::{OutputPin, PinState};

/// Number of RF switch control lines supported
pub const RF_SWITCH_PINS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RfMode {
    Idle,
    Rx,
    /// Transmit on the low power PA
    TxLp,
    /// Transmit on the high power PA
    TxHp,
}

impl RfMode {
    const COUNT: usize = 4;
}

/// Pin states per radio mode. Modes without an entry are not available on
/// the board; switching to them leaves the pins as they are.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RfSwitchTable {
    modes: [Option<[PinState; RF_SWITCH_PINS]>; RfMode::COUNT],
}

impl Default for RfSwitchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RfSwitchTable {
    /// A table without any modes
    pub const fn new() -> Self {
        Self {
            modes: [None; RfMode::COUNT],
        }
    }

    pub const fn with(mut self, mode: RfMode, pins: [PinState; RF_SWITCH_PINS]) -> Self {
        self.modes[mode as usize] = Some(pins);
        self
    }

    pub fn pins(&self, mode: RfMode) -> Option<[PinState; RF_SWITCH_PINS]> {
        self.modes[mode as usize]
    }

    pub fn supports(&self, mode: RfMode) -> bool {
        self.pins(mode).is_some()
    }
}

/// The control lines of an RF switch, together with the table that
/// tells which of them to drive high in which mode
pub struct RfSwitch<P> {
    pins: [P; RF_SWITCH_PINS],
    table: Option<RfSwitchTable>,
}

impl<P: OutputPin> RfSwitch<P> {
    pub fn new(pins: [P; RF_SWITCH_PINS]) -> Self {
        Self { pins, table: None }
    }

    pub fn set_table(&mut self, table: RfSwitchTable) {
        self.table = Some(table);
    }

    pub fn table(&self) -> Option<&RfSwitchTable> {
        self.table.as_ref()
    }

    /// Drive the control lines for `mode`
    pub fn set_mode(&mut self, mode: RfMode) -> Result<(), P::Error> {
        let Some(states) = self.table.and_then(|table| table.pins(mode)) else {
            return Ok(());
        };
        for (pin, state) in self.pins.iter_mut().zip(states) {
            pin.set_state(state)?;
        }
        Ok(())
    }
}
