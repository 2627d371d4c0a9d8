/// Power regulator used by the radio, see SetRegulatorMode
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegulatorMode {
    /// Only the LDO is used, in all modes
    Ldo = 0x00,
    /// DC-DC + LDO used for STBY_XOSC, FS, RX and TX modes
    DcDc = 0x01,
}
