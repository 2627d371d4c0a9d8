#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ModParams {
    inner: [u8; 8],
}

impl From<ModParams> for [u8; 8] {
    fn from(val: ModParams) -> Self {
        val.inner
    }
}

pub mod lora {
    use super::ModParams;

    /// Symbol period from which LDRO becomes mandatory
    const LDRO_SYMBOL_TIME_US: u32 = 16_000;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoRaSpreadFactor {
        SF5 = 0x05,
        SF6 = 0x06,
        SF7 = 0x07,
        SF8 = 0x08,
        SF9 = 0x09,
        SF10 = 0x0A,
        SF11 = 0x0B,
        SF12 = 0x0C,
    }

    impl LoRaSpreadFactor {
        pub const fn from_factor(sf: u8) -> Option<Self> {
            use LoRaSpreadFactor::*;
            match sf {
                5 => Some(SF5),
                6 => Some(SF6),
                7 => Some(SF7),
                8 => Some(SF8),
                9 => Some(SF9),
                10 => Some(SF10),
                11 => Some(SF11),
                12 => Some(SF12),
                _ => None,
            }
        }

        /// Number of chips per symbol
        pub const fn chips(self) -> u32 {
            1 << (self as u8)
        }
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoraBandWidth {
        /// 7.81 kHz
        BW7 = 0x00,
        /// 10.42 kHz
        BW10 = 0x08,
        /// 15.63 kHz
        BW15 = 0x01,
        /// 20.83 kHz
        BW20 = 0x09,
        /// 31.25 kHz
        BW31 = 0x02,
        /// 41.67 kHz
        BW41 = 0x0A,
        /// 62.50 kHz
        BW62 = 0x03,
        /// 125 kHz
        BW125 = 0x04,
        /// 250 kHz
        BW250 = 0x05,
        /// 500 kHz
        BW500 = 0x06,
    }

    impl LoraBandWidth {
        const ALL: [Self; 10] = [
            Self::BW7,
            Self::BW10,
            Self::BW15,
            Self::BW20,
            Self::BW31,
            Self::BW41,
            Self::BW62,
            Self::BW125,
            Self::BW250,
            Self::BW500,
        ];

        /// Exact bandwidth in Hz
        pub const fn hz(self) -> u32 {
            use LoraBandWidth::*;
            match self {
                BW7 => 7_812,
                BW10 => 10_417,
                BW15 => 15_625,
                BW20 => 20_833,
                BW31 => 31_250,
                BW41 => 41_667,
                BW62 => 62_500,
                BW125 => 125_000,
                BW250 => 250_000,
                BW500 => 500_000,
            }
        }

        /// Match a bandwidth given in kHz the way it is usually written
        /// down (7.8, 10.4, 15.6, 20.8, 31.25, 41.7, 62.5, 125, 250, 500)
        pub fn from_khz(khz: f32) -> Option<Self> {
            Self::ALL.into_iter().find(|bw| {
                let diff = bw.hz() as f32 / 1000.0 - khz;
                diff.abs() < 0.05
            })
        }
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[repr(u8)]
    pub enum LoraCodingRate {
        CR4_5 = 0x01,
        CR4_6 = 0x02,
        CR4_7 = 0x03,
        CR4_8 = 0x04,
    }

    impl LoraCodingRate {
        /// Coding rate from its denominator, 5 for 4/5 up to 8 for 4/8
        pub const fn from_denominator(cr: u8) -> Option<Self> {
            use LoraCodingRate::*;
            match cr {
                5 => Some(CR4_5),
                6 => Some(CR4_6),
                7 => Some(CR4_7),
                8 => Some(CR4_8),
                _ => None,
            }
        }
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LoraModParams {
        spread_factor: LoRaSpreadFactor,
        bandwith: LoraBandWidth,
        coding_rate: LoraCodingRate,
        /// LowDataRateOptimize
        low_dr_opt: bool,
    }

    impl Default for LoraModParams {
        fn default() -> Self {
            Self {
                spread_factor: LoRaSpreadFactor::SF7,
                bandwith: LoraBandWidth::BW125,
                coding_rate: LoraCodingRate::CR4_5,
                low_dr_opt: false,
            }
        }
    }

    impl From<LoraModParams> for ModParams {
        fn from(val: LoraModParams) -> Self {
            ModParams {
                inner: [
                    val.spread_factor as u8,
                    val.bandwith as u8,
                    val.coding_rate as u8,
                    val.low_dr_opt as u8,
                    0x00,
                    0x00,
                    0x00,
                    0x00,
                ],
            }
        }
    }

    impl LoraModParams {
        /// Sets the spread factor, and enables LDRO when the resulting
        /// symbol period requires it
        pub fn set_spread_factor(mut self, spread_factor: LoRaSpreadFactor) -> Self {
            self.spread_factor = spread_factor;
            self.low_dr_opt = self.ldro_required();
            self
        }

        /// Sets the bandwidth, and enables LDRO when the resulting
        /// symbol period requires it
        pub fn set_bandwidth(mut self, bandwith: LoraBandWidth) -> Self {
            self.bandwith = bandwith;
            self.low_dr_opt = self.ldro_required();
            self
        }

        pub fn set_coding_rate(mut self, coding_rate: LoraCodingRate) -> Self {
            self.coding_rate = coding_rate;
            self
        }

        /// Overrides the automatic LDRO selection
        pub fn set_low_dr_opt(mut self, low_dr_opt: bool) -> Self {
            self.low_dr_opt = low_dr_opt;
            self
        }

        pub fn spread_factor(&self) -> LoRaSpreadFactor {
            self.spread_factor
        }

        pub fn bandwidth(&self) -> LoraBandWidth {
            self.bandwith
        }

        pub fn low_dr_opt(&self) -> bool {
            self.low_dr_opt
        }

        /// Duration of one symbol in microseconds
        pub fn symbol_time_us(&self) -> u32 {
            (self.spread_factor.chips() as u64 * 1_000_000 / self.bandwith.hz() as u64) as u32
        }

        fn ldro_required(&self) -> bool {
            self.symbol_time_us() >= LDRO_SYMBOL_TIME_US
        }
    }
}
