//! Parameters of the SX126x commands used by this crate, encoded the way
//! the chip expects them on the wire (datasheet chapter 13)

// Divide a value in a quick fashion using multiplication and shifting
macro_rules! divide {
    ($v: ident, 15.625) => {
        // 15.625 == 125/8
        // -> 8/125 ~ 131/2048
        // -> 2048 = 2^11
        // -> v / 15.625 ~ (v * 131) >> 11
        ($v * 131) >> 11
    };
}

pub mod calib;
pub mod err;
pub mod irq;
pub mod modulation;
pub mod packet;
pub mod regulator;
pub mod rxtx;
pub mod status;
pub mod tcxo;

pub use calib::*;
pub use err::*;
pub use irq::*;
pub use modulation::ModParams;
pub use packet::{PacketParams, PacketType};
pub use regulator::*;
pub use rxtx::*;
pub use status::*;
pub use tcxo::*;
