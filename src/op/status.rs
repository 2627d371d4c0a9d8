#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Status {
    inner: u8,
}

impl core::fmt::Debug for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Status {{inner: {:#010b}, chip_mode: {:?}}}",
            self.inner,
            self.chip_mode()
        )
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChipMode {
    StbyRC = 0x02,
    StbyXOSC = 0x03,
    FS = 0x04,
    RX = 0x05,
    TX = 0x06,
}

impl From<u8> for Status {
    fn from(b: u8) -> Self {
        Self { inner: b }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.inner
    }
}

impl Status {
    pub fn chip_mode(&self) -> Option<ChipMode> {
        use ChipMode::*;
        match (self.inner & 0x70) >> 4 {
            0x02 => Some(StbyRC),
            0x03 => Some(StbyXOSC),
            0x04 => Some(FS),
            0x05 => Some(RX),
            0x06 => Some(TX),
            _ => None,
        }
    }

    /// A chip that is powered and talking SPI reports one of the
    /// standby modes right after SetStandby
    pub fn in_standby(&self) -> bool {
        matches!(
            self.chip_mode(),
            Some(ChipMode::StbyRC) | Some(ChipMode::StbyXOSC)
        )
    }
}

/// LoRa packet status of the last received packet
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PacketStatus {
    rssi_pkt: u8,
    snr_pkt: i8,
    signal_rssi_pkt: u8,
}

impl From<[u8; 3]> for PacketStatus {
    fn from(b: [u8; 3]) -> Self {
        Self {
            rssi_pkt: b[0],
            snr_pkt: i8::from_be_bytes([b[1]]),
            signal_rssi_pkt: b[2],
        }
    }
}

impl PacketStatus {
    /// Average RSSI over the last packet, in dBm
    pub fn rssi_pkt(&self) -> f32 {
        self.rssi_pkt as f32 / -2.0
    }

    /// SNR of the last packet, in dB
    pub fn snr_pkt(&self) -> f32 {
        self.snr_pkt as f32 / 4.0
    }

    /// RSSI of the despread LoRa signal, in dBm
    pub fn signal_rssi_pkt(&self) -> f32 {
        self.signal_rssi_pkt as f32 / -2.0
    }
}
