use std::vec::Vec;

use crate::interface::{sealed, Interface};
use crate::Error;

/// Register file standing in for the sensor.
#[derive(Clone, Debug)]
pub(crate) struct MockInterface {
    regs: [u8; 256],
    reads: Vec<(u8, usize)>,
    writes: Vec<(u8, u8)>,
    write_bursts: Vec<(u8, Vec<u8>)>,
    self_clearing: Option<(u8, u8)>,
    failing: bool,
}

impl Default for MockInterface {
    fn default() -> Self {
        Self {
            regs: [0u8; 256],
            reads: Vec::new(),
            writes: Vec::new(),
            write_bursts: Vec::new(),
            self_clearing: None,
            failing: false,
        }
    }
}

impl MockInterface {
    pub(crate) fn with_reg(mut self, reg: u8, value: u8) -> Self {
        self.set_reg(reg, value);
        self
    }

    /// Clears `mask` in `reg` right after every write to it, as if the
    /// device finished the requested operation instantly.
    pub(crate) fn with_self_clearing(mut self, reg: u8, mask: u8) -> Self {
        self.self_clearing = Some((reg, mask));
        self
    }

    pub(crate) fn set_reg(&mut self, reg: u8, value: u8) {
        self.regs[reg as usize] = value;
    }

    pub(crate) fn reg(&self, reg: u8) -> u8 {
        self.regs[reg as usize]
    }

    /// Makes every access fail with `Error::I2c(())`.
    pub(crate) fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub(crate) fn reads(&self) -> &[(u8, usize)] {
        &self.reads
    }

    pub(crate) fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub(crate) fn write_bursts(&self) -> &[(u8, Vec<u8>)] {
        &self.write_bursts
    }

    fn check(&self) -> Result<(), Error<()>> {
        if self.failing {
            Err(Error::I2c(()))
        } else {
            Ok(())
        }
    }

    fn store(&mut self, reg: u8, value: u8) {
        self.regs[reg as usize] = match self.self_clearing {
            Some((clear_reg, mask)) if clear_reg == reg => value & !mask,
            _ => value,
        };
    }
}

impl Interface for MockInterface {
    type BusError = ();

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error<()>> {
        self.check()?;
        self.reads.push((reg, 1));
        Ok(self.regs[reg as usize])
    }

    fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error<()>> {
        self.check()?;
        self.reads.push((reg, buffer.len()));
        for (offset, slot) in buffer.iter_mut().enumerate() {
            let addr = reg.wrapping_add(offset as u8);
            *slot = self.regs[addr as usize];
        }
        Ok(())
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<()>> {
        self.check()?;
        self.writes.push((reg, value));
        self.store(reg, value);
        Ok(())
    }

    fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<()>> {
        self.check()?;
        for (offset, value) in data.iter().enumerate() {
            self.store(reg.wrapping_add(offset as u8), *value);
        }
        self.write_bursts.push((reg, data.to_vec()));
        Ok(())
    }
}

impl sealed::Sealed for MockInterface {}

/// Delay that only accumulates the requested time.
#[derive(Default, Debug)]
pub(crate) struct MockDelay {
    pub(crate) total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
