/// SX126X registers this crate touches
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum Register {
    /// Number of registers in the retention list, restored when waking
    /// up from warm-start sleep. The big-endian register addresses
    /// follow from 0x02A0 on.
    RetentionListCount = 0x029F,
    /// Optimize the inverted IQ operation (datasheet 15.4)
    IqPolaritySetup = 0x0736,
    /// Differantiate the LoRa signal for Public or Private Network; MSB
    /// Set to 0x3444 for Public Netwok
    /// Set to 0x1424 for Private Network
    LoRaSyncWordMsb = 0x0740,
    /// Set the gain used in Rx mode:
    /// Rx Power Saving gain: 0x94,
    /// Rx Boosted gain: 0x96
    RxGain = 0x08AC,
    /// Set the Over Current Protection level, in steps of 2.5 mA
    OcpConfiguration = 0x08E7,
    /// Enable or disable RTC Timer
    RtcControl = 0x0902,
    /// Used to clear events
    EventMask = 0x0944,
}

impl From<Register> for u16 {
    fn from(reg: Register) -> Self {
        reg as u16
    }
}

/// Register value of a one-byte LoRa sync word, as used by the
/// Semtech reference code: 0x12 (private) becomes 0x1424 and
/// 0x34 (public) becomes 0x3444
pub const fn lora_sync_word(sync_word: u8) -> u16 {
    const CONTROL_BITS: u8 = 0x44;
    let msb = (sync_word & 0xF0) | ((CONTROL_BITS & 0xF0) >> 4);
    let lsb = ((sync_word & 0x0F) << 4) | (CONTROL_BITS & 0x0F);
    u16::from_be_bytes([msb, lsb])
}
