#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IrqMaskBit {
    None = 0x0000,
    TxDone = 1 << 0,
    RxDone = 1 << 1,
    PreambleDetected = 1 << 2,
    SyncwordValid = 1 << 3,
    HeaderValid = 1 << 4,
    HeaderError = 1 << 5,
    CrcErr = 1 << 6,
    CadDone = 1 << 7,
    CadDetected = 1 << 8,
    Timeout = 1 << 9,
    All = 0x03FF,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IrqMask {
    inner: u16,
}

impl IrqMask {
    pub const fn none() -> Self {
        Self {
            inner: IrqMaskBit::None as u16,
        }
    }

    pub const fn all() -> Self {
        Self {
            inner: IrqMaskBit::All as u16,
        }
    }

    /// Every IRQ that ends a single receive window
    pub const fn rx_finished() -> Self {
        Self::none()
            .combine(IrqMaskBit::RxDone)
            .combine(IrqMaskBit::Timeout)
            .combine(IrqMaskBit::CrcErr)
            .combine(IrqMaskBit::HeaderError)
    }

    pub const fn combine(self, bit: IrqMaskBit) -> Self {
        let inner = self.inner | bit as u16;
        Self { inner }
    }
}

impl From<IrqMask> for u16 {
    fn from(val: IrqMask) -> Self {
        val.inner
    }
}

impl From<u16> for IrqMask {
    fn from(mask: u16) -> Self {
        Self { inner: mask }
    }
}

impl Default for IrqMask {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct IrqStatus {
    inner: u16,
}

impl From<u16> for IrqStatus {
    fn from(status: u16) -> Self {
        Self { inner: status }
    }
}

impl From<IrqStatus> for u16 {
    fn from(status: IrqStatus) -> Self {
        status.inner
    }
}

impl core::fmt::Debug for IrqStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "IrqStatus {{inner: {:#012b}, rx_done: {}, header_error: {}, crc_err: {}, timeout: {}}}",
            self.inner,
            self.rx_done(),
            self.header_error(),
            self.crc_err(),
            self.timeout(),
        )
    }
}

impl IrqStatus {
    fn is_set(self, bit: IrqMaskBit) -> bool {
        (self.inner & bit as u16) > 0
    }

    /// Whether any of the IRQs in `mask` is raised
    pub fn any(self, mask: IrqMask) -> bool {
        (self.inner & u16::from(mask)) > 0
    }

    pub fn rx_done(self) -> bool {
        self.is_set(IrqMaskBit::RxDone)
    }

    pub fn header_error(self) -> bool {
        self.is_set(IrqMaskBit::HeaderError)
    }

    pub fn crc_err(self) -> bool {
        self.is_set(IrqMaskBit::CrcErr)
    }

    pub fn timeout(self) -> bool {
        self.is_set(IrqMaskBit::Timeout)
    }
}
