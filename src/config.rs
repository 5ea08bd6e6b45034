//! Driver configuration.

use crate::PressureAlt;

/// Oversampling ratio (CTRL_REG1.OS).
///
/// Higher ratios lower noise at the cost of conversion time, from about 6 ms
/// at 1x up to about 512 ms at 128x.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oversampling {
    Os1 = 0,
    Os2 = 1,
    Os4 = 2,
    Os8 = 3,
    Os16 = 4,
    Os32 = 5,
    Os64 = 6,
    Os128 = 7,
}

impl Oversampling {
    pub(crate) const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of internal samples averaged per conversion.
    pub const fn ratio(self) -> u8 {
        1 << self.bits()
    }
}

/// Settings applied by [`MPL3115A2::begin`](crate::MPL3115A2::begin) and used
/// by the blocking calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub(crate) oversampling: Oversampling,
    pub(crate) mode: PressureAlt,
    pub(crate) poll_interval_ms: u32,
    pub(crate) max_wait_polls: u16,
}

impl Config {
    /// 128x oversampling, altimeter mode, 10 ms poll interval, 100 polls.
    pub const fn new() -> Self {
        Self {
            oversampling: Oversampling::Os128,
            mode: PressureAlt::Altitude,
            poll_interval_ms: 10,
            max_wait_polls: 100,
        }
    }

    /// Sets the oversampling ratio.
    #[must_use]
    pub const fn with_oversampling(mut self, oversampling: Oversampling) -> Self {
        self.oversampling = oversampling;
        self
    }

    /// Sets the measurement mode written during `begin`.
    #[must_use]
    pub const fn with_mode(mut self, mode: PressureAlt) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the delay between two polls of a busy or ready bit.
    #[must_use]
    pub const fn with_poll_interval_ms(mut self, interval: u32) -> Self {
        self.poll_interval_ms = interval;
        self
    }

    /// Sets how many polls a blocking wait makes before giving up.
    #[must_use]
    pub const fn with_max_wait_polls(mut self, polls: u16) -> Self {
        self.max_wait_polls = polls;
        self
    }

    pub const fn oversampling(&self) -> Oversampling {
        self.oversampling
    }

    pub const fn mode(&self) -> PressureAlt {
        self.mode
    }

    pub const fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    pub const fn max_wait_polls(&self) -> u16 {
        self.max_wait_polls
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
