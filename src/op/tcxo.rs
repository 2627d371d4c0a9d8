#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TcxoVoltage {
    Volt1_6 = 0x00,
    Volt1_7 = 0x01,
    Volt1_8 = 0x02,
    Volt2_2 = 0x03,
    Volt2_4 = 0x04,
    Volt2_7 = 0x05,
    Volt3_0 = 0x06,
    Volt3_3 = 0x07,
}

impl TcxoVoltage {
    const ALL: [(f32, Self); 8] = [
        (1.6, Self::Volt1_6),
        (1.7, Self::Volt1_7),
        (1.8, Self::Volt1_8),
        (2.2, Self::Volt2_2),
        (2.4, Self::Volt2_4),
        (2.7, Self::Volt2_7),
        (3.0, Self::Volt3_0),
        (3.3, Self::Volt3_3),
    ];

    /// The supply voltage DIO3 provides closest to `volts`, if it is
    /// one of the eight the radio supports
    pub fn from_volts(volts: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|(v, _)| (v - volts).abs() < 0.01)
            .map(|(_, voltage)| voltage)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TcxoDelay {
    inner: [u8; 3],
}

impl From<TcxoDelay> for [u8; 3] {
    fn from(val: TcxoDelay) -> Self {
        val.inner
    }
}

impl TcxoDelay {
    pub const fn from_us(us: u32) -> Self {
        let inner = divide!(us, 15.625);
        let inner = inner.to_le_bytes();
        let inner = [inner[2], inner[1], inner[0]];
        Self { inner }
    }
}
