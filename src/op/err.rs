/// Contents of the OpError register, as returned by GetDeviceErrors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceErrors {
    inner: u16,
}

impl From<u16> for DeviceErrors {
    fn from(val: u16) -> Self {
        Self { inner: val }
    }
}

impl From<DeviceErrors> for u16 {
    fn from(val: DeviceErrors) -> Self {
        val.inner
    }
}

impl DeviceErrors {
    pub fn xosc_start_err(self) -> bool {
        (self.inner & 1 << 5) > 0
    }
}
