//! MPL3115A2 register map and bit masks.

#![allow(dead_code)] // Full register map; not every entry is used by the driver.

/// Fixed 7-bit I²C address of the MPL3115A2.
pub const MPL3115A2_ADDRESS: u8 = 0x60;

/// Register addresses.
pub(crate) mod addr {
    pub(crate) const STATUS: u8 = 0x00;
    pub(crate) const OUT_P_MSB: u8 = 0x01;
    pub(crate) const OUT_P_CSB: u8 = 0x02;
    pub(crate) const OUT_P_LSB: u8 = 0x03;
    pub(crate) const OUT_T_MSB: u8 = 0x04;
    pub(crate) const OUT_T_LSB: u8 = 0x05;
    pub(crate) const DR_STATUS: u8 = 0x06;
    pub(crate) const OUT_P_DELTA_MSB: u8 = 0x07;
    pub(crate) const OUT_P_DELTA_CSB: u8 = 0x08;
    pub(crate) const OUT_P_DELTA_LSB: u8 = 0x09;
    pub(crate) const OUT_T_DELTA_MSB: u8 = 0x0A;
    pub(crate) const OUT_T_DELTA_LSB: u8 = 0x0B;
    pub(crate) const WHO_AM_I: u8 = 0x0C;
    pub(crate) const PT_DATA_CFG: u8 = 0x13;
    pub(crate) const BAR_IN_MSB: u8 = 0x14;
    pub(crate) const BAR_IN_LSB: u8 = 0x15;
    pub(crate) const CTRL_REG1: u8 = 0x26;
    pub(crate) const CTRL_REG2: u8 = 0x27;
    pub(crate) const CTRL_REG3: u8 = 0x28;
    pub(crate) const CTRL_REG4: u8 = 0x29;
    pub(crate) const CTRL_REG5: u8 = 0x2A;
    pub(crate) const OFF_H: u8 = 0x2D;
}

/// Expected WHO_AM_I value.
pub(crate) const DEVICE_ID: u8 = 0xC4;

/// STATUS register bits.
pub(crate) mod status {
    /// Temperature data ready.
    pub(crate) const TDR: u8 = 0x02;
    /// Pressure/altitude data ready.
    pub(crate) const PDR: u8 = 0x04;
    /// Pressure/altitude or temperature data ready.
    pub(crate) const PTDR: u8 = 0x08;
}

/// PT_DATA_CFG register bits.
pub(crate) mod pt_data_cfg {
    /// Temperature data ready event flag enable.
    pub(crate) const TDEFE: u8 = 0x01;
    /// Pressure/altitude data ready event flag enable.
    pub(crate) const PDEFE: u8 = 0x02;
    /// Data ready event mode.
    pub(crate) const DREM: u8 = 0x04;
}

/// CTRL_REG1 bits.
pub(crate) mod ctrl1 {
    pub(crate) const SBYB: u8 = 0x01;
    pub(crate) const OST: u8 = 0x02;
    pub(crate) const RST: u8 = 0x04;
    pub(crate) const OS_SHIFT: u8 = 3;
    pub(crate) const OS_MASK: u8 = 0x38;
    pub(crate) const RAW: u8 = 0x40;
    pub(crate) const ALT: u8 = 0x80;
}

/// Local shadow of CTRL_REG1.
///
/// Bits are flipped here and the whole byte is written back, so the driver
/// never has to read the register just to change one field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Ctrl1(u8);

impl Ctrl1 {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub(crate) const fn bits(self) -> u8 {
        self.0
    }

    const fn with(self, mask: u8, enable: bool) -> Self {
        if enable {
            Self(self.0 | mask)
        } else {
            Self(self.0 & !mask)
        }
    }

    pub(crate) const fn one_shot(self) -> bool {
        self.0 & ctrl1::OST != 0
    }

    pub(crate) fn set_one_shot(&mut self, enable: bool) {
        *self = self.with(ctrl1::OST, enable);
    }

    pub(crate) const fn altimeter(self) -> bool {
        self.0 & ctrl1::ALT != 0
    }

    pub(crate) fn set_altimeter(&mut self, enable: bool) {
        *self = self.with(ctrl1::ALT, enable);
    }

    pub(crate) const fn oversampling_bits(self) -> u8 {
        (self.0 & ctrl1::OS_MASK) >> ctrl1::OS_SHIFT
    }

    pub(crate) fn set_oversampling_bits(&mut self, ratio: u8) {
        self.0 = (self.0 & !ctrl1::OS_MASK) | ((ratio << ctrl1::OS_SHIFT) & ctrl1::OS_MASK);
    }
}
