#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PacketType {
    GFSK = 0x00,
    LoRa = 0x01,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PacketParams {
    inner: [u8; 9],
}

impl From<PacketParams> for [u8; 9] {
    fn from(val: PacketParams) -> Self {
        val.inner
    }
}

pub mod lora {
    use super::PacketParams;

    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum LoRaHeaderType {
        /// Variable length packet (explicit header)
        VarLen = 0x00,
        /// Fixed length packet (implicit header)
        FixedLen = 0x01,
    }

    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum LoRaCrcType {
        /// CRC off
        CrcOff = 0x00,
        /// CRC on
        CrcOn = 0x01,
    }

    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum LoRaInvertIq {
        /// Standard IQ setup
        Standard = 0x00,
        /// Inverted IQ setup
        Inverted = 0x01,
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LoRaPacketParams {
        /// Number of LoRa® symbols sent as preamble
        preamble_len: u16,
        /// With an explicit header the payload length, coding rate and
        /// header CRC travel in the LoRa® header. An implicit header
        /// requires both ends to agree on them beforehand.
        header_type: LoRaHeaderType,
        /// Maximum payload the receiver accepts, or the exact payload
        /// length in implicit header mode
        payload_len: u8,
        crc_type: LoRaCrcType,
        invert_iq: LoRaInvertIq,
    }

    impl From<LoRaPacketParams> for PacketParams {
        fn from(val: LoRaPacketParams) -> Self {
            let preamble_len = val.preamble_len.to_be_bytes();

            PacketParams {
                inner: [
                    preamble_len[0],
                    preamble_len[1],
                    val.header_type as u8,
                    val.payload_len,
                    val.crc_type as u8,
                    val.invert_iq as u8,
                    0x00,
                    0x00,
                    0x00,
                ],
            }
        }
    }

    impl Default for LoRaPacketParams {
        fn default() -> Self {
            Self {
                preamble_len: 8,
                header_type: LoRaHeaderType::VarLen,
                payload_len: 0xFF,
                crc_type: LoRaCrcType::CrcOn,
                invert_iq: LoRaInvertIq::Standard,
            }
        }
    }

    impl LoRaPacketParams {
        pub fn set_preamble_len(mut self, preamble_len: u16) -> Self {
            self.preamble_len = preamble_len;
            self
        }

        pub fn set_header_type(mut self, header_type: LoRaHeaderType) -> Self {
            self.header_type = header_type;
            self
        }

        pub fn set_payload_len(mut self, payload_len: u8) -> Self {
            self.payload_len = payload_len;
            self
        }

        pub fn header_type(&self) -> LoRaHeaderType {
            self.header_type
        }

        pub fn invert_iq(&self) -> LoRaInvertIq {
            self.invert_iq
        }
    }
}
