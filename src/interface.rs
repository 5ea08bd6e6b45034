//! Register transport.

#[cfg(feature = "blocking")]
use embedded_hal::i2c::I2c;
#[cfg(feature = "async")]
use embedded_hal_async::i2c::I2c as AsyncI2c;

use crate::Error;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Longest burst the driver writes (BAR_IN_MSB/LSB).
const MAX_BURST: usize = 3;

/// Byte-level register access at the sensor's bus address.
#[maybe_async_cfg::maybe(
    sync(feature = "blocking", keep_self),
    async(feature = "async", keep_self)
)]
#[allow(async_fn_in_trait)]
pub trait Interface: sealed::Sealed {
    /// Error reported by the underlying bus.
    type BusError;

    /// Reads a single register.
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error<Self::BusError>>;
    /// Reads consecutive registers starting at `reg`.
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8])
        -> Result<(), Error<Self::BusError>>;
    /// Writes a single register.
    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<Self::BusError>>;
    /// Writes consecutive registers starting at `reg`.
    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<Self::BusError>>;
}

/// I²C register interface.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface with the given bus and 7-bit address.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Releases the underlying I²C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[maybe_async_cfg::maybe(
    sync(feature = "blocking", keep_self, idents(AsyncI2c(sync = "I2c"))),
    async(feature = "async", keep_self)
)]
impl<I2C> Interface for I2cInterface<I2C>
where
    I2C: AsyncI2c,
{
    type BusError = I2C::Error;

    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buffer = [0u8];
        self.read_regs(reg, &mut buffer).await?;
        Ok(buffer[0])
    }

    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.i2c
            .write_read(self.address, &[reg], buffer)
            .await
            .map_err(Error::I2c)
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(Error::I2c)
    }

    async fn write_regs(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.len() > MAX_BURST {
            return Err(Error::InvalidData);
        }
        let mut buffer = [0u8; MAX_BURST + 1];
        buffer[0] = reg;
        buffer[1..=data.len()].copy_from_slice(data);
        self.i2c
            .write(self.address, &buffer[..=data.len()])
            .await
            .map_err(Error::I2c)
    }
}

impl<I2C> sealed::Sealed for I2cInterface<I2C> {}

#[cfg(all(test, feature = "blocking"))]
mod tests {
    use super::*;
    use crate::reg::MPL3115A2_ADDRESS;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn burst_write_prefixes_register() {
        let i2c = I2cMock::new(&[I2cTransaction::write(
            MPL3115A2_ADDRESS,
            vec![0x14, 0xC5, 0xE6],
        )]);
        let mut interface = I2cInterface::new(i2c, MPL3115A2_ADDRESS);
        interface.write_regs(0x14, &[0xC5, 0xE6]).unwrap();
        interface.release().done();
    }

    #[test]
    fn oversized_burst_is_rejected_without_bus_traffic() {
        let i2c = I2cMock::new(&[] as &[I2cTransaction]);
        let mut interface = I2cInterface::new(i2c, MPL3115A2_ADDRESS);
        assert!(matches!(
            interface.write_regs(0x14, &[1, 2, 3, 4]),
            Err(Error::InvalidData)
        ));
        interface.release().done();
    }

    #[test]
    fn empty_read_skips_bus() {
        let i2c = I2cMock::new(&[] as &[I2cTransaction]);
        let mut interface = I2cInterface::new(i2c, MPL3115A2_ADDRESS);
        interface.read_regs(0x01, &mut []).unwrap();
        interface.release().done();
    }
}
