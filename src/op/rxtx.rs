#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StandbyConfig {
    /// 13 MHz RC oscillator
    StbyRc = 0x00,
    /// 32 MHz crystal or TCXO
    StbyXosc = 0x01,
}

/// Timeout of SetRx/SetTx, in steps of 15.625 µs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RxTxTimeout {
    inner: [u8; 3],
}

impl From<RxTxTimeout> for [u8; 3] {
    fn from(val: RxTxTimeout) -> Self {
        val.inner
    }
}

impl RxTxTimeout {
    /// Longest timeout the 24 bit field can hold, in ms
    pub const MAX_MS: u32 = 0x00FF_FFFF >> 6;

    /// Timeout after `ms` milliseconds, saturating at [`RxTxTimeout::MAX_MS`]
    pub const fn from_ms(ms: u32) -> Self {
        let ms = if ms > Self::MAX_MS { Self::MAX_MS } else { ms };
        let inner = ms << 6;
        let inner = inner.to_le_bytes();
        let inner = [inner[2], inner[1], inner[0]];
        Self { inner }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RampTime {
    /// 10us
    Ramp10u = 0x00,
    /// 20us
    Ramp20u = 0x01,
    /// 40u
    Ramp40u = 0x02,
    /// 80us
    Ramp80u = 0x03,
    /// 200us
    Ramp200u = 0x04,
    /// 800us
    Ramp800u = 0x05,
    /// 1700us
    Ramp1700u = 0x06,
    /// 3400us
    Ramp3400u = 0x07,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TxParams {
    power_dbm: i8,
    ramp_time: RampTime,
}

impl Default for TxParams {
    fn default() -> Self {
        Self {
            power_dbm: 0,
            ramp_time: RampTime::Ramp200u,
        }
    }
}

impl From<TxParams> for [u8; 2] {
    fn from(val: TxParams) -> Self {
        [val.power_dbm as u8, val.ramp_time as u8]
    }
}

impl TxParams {
    /// The output power is defined as power in dBm in a range of
    /// - -17 (0xEF) to +14 (0x0E) dBm by step of 1 dB if low power PA is selected
    /// - -9 (0xF7) to +22 (0x16) dBm by step of 1 dB if high power PA is selected
    pub fn set_power_dbm(mut self, power_dbm: i8) -> Self {
        debug_assert!(power_dbm >= -17);
        debug_assert!(power_dbm <= 22);
        self.power_dbm = power_dbm;
        self
    }
}

/// Power amplifier of the STM32WL sub-GHz radio
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaSel {
    /// High power PA, -9 to +22 dBm
    Hp = 0x00,
    /// Low power PA, -17 to +15 dBm
    Lp = 0x01,
}

impl PaSel {
    pub const fn power_range(self) -> core::ops::RangeInclusive<i8> {
        match self {
            PaSel::Hp => -9..=22,
            PaSel::Lp => -17..=14,
        }
    }

    /// Over current protection level for this PA: 60 mA for the low
    /// power PA, 140 mA for the high power one (steps of 2.5 mA)
    pub const fn ocp(self) -> u8 {
        match self {
            PaSel::Hp => 0x38,
            PaSel::Lp => 0x18,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaConfig {
    pa_duty_cycle: u8,
    hp_max: u8,
    pa_sel: PaSel,
}

impl From<PaConfig> for [u8; 4] {
    fn from(val: PaConfig) -> Self {
        [val.pa_duty_cycle, val.hp_max, val.pa_sel as u8, 0x01]
    }
}

impl PaConfig {
    /// Optimal setting for a +14 dBm maximum on the low power PA
    pub const LP_14: Self = Self {
        pa_duty_cycle: 0x04,
        hp_max: 0x00,
        pa_sel: PaSel::Lp,
    };

    /// Optimal setting for a +22 dBm maximum on the high power PA
    pub const HP_22: Self = Self {
        pa_duty_cycle: 0x04,
        hp_max: 0x07,
        pa_sel: PaSel::Hp,
    };

    pub const fn for_pa(pa_sel: PaSel) -> Self {
        match pa_sel {
            PaSel::Hp => Self::HP_22,
            PaSel::Lp => Self::LP_14,
        }
    }
}

/// Receiver gain, written to the RxGain register
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RxGain {
    PowerSaving = 0x94,
    Boosted = 0x96,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RxBufferStatus {
    payload_length_rx: u8,
    rx_start_buffer_pointer: u8,
}

impl From<[u8; 2]> for RxBufferStatus {
    fn from(raw: [u8; 2]) -> Self {
        Self {
            payload_length_rx: raw[0],
            rx_start_buffer_pointer: raw[1],
        }
    }
}

impl RxBufferStatus {
    pub fn payload_length_rx(&self) -> u8 {
        self.payload_length_rx
    }

    pub fn rx_start_buffer_pointer(&self) -> u8 {
        self.rx_start_buffer_pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_in_rtc_steps() {
        // 1 ms == 64 steps of 15.625 µs
        let raw: [u8; 3] = RxTxTimeout::from_ms(1).into();
        assert_eq!(raw, [0x00, 0x00, 0x40]);
        let raw: [u8; 3] = RxTxTimeout::from_ms(39_380).into();
        assert_eq!(raw, [0x26, 0x75, 0x00]);
        let raw: [u8; 3] = RxTxTimeout::from_ms(u32::MAX).into();
        assert_eq!(raw, [0xFF, 0xFF, 0xC0]);
    }

    #[test]
    fn negative_power_is_twos_complement() {
        let raw: [u8; 2] = TxParams::default().set_power_dbm(-9).into();
        assert_eq!(raw, [0xF7, RampTime::Ramp200u as u8]);
    }

    #[test]
    fn pa_presets() {
        let raw: [u8; 4] = PaConfig::for_pa(PaSel::Lp).into();
        assert_eq!(raw, [0x04, 0x00, 0x01, 0x01]);
        let raw: [u8; 4] = PaConfig::for_pa(PaSel::Hp).into();
        assert_eq!(raw, [0x04, 0x07, 0x00, 0x01]);
        assert!(PaSel::Lp.power_range().contains(&10));
        assert!(!PaSel::Lp.power_range().contains(&15));
    }
}
