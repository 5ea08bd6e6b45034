#[cfg(feature = "blocking")]
use embedded_hal::delay::DelayNs;
#[cfg(feature = "async")]
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use crate::config::Config;
use crate::interface::{I2cInterface, Interface};
use crate::reg::{addr, ctrl1, pt_data_cfg, status, Ctrl1, DEVICE_ID, MPL3115A2_ADDRESS};
use crate::sequencer::{Sequencer, SequencerState};
use crate::{decode, Error, Measurement, PressureAlt};

/// MPL3115A2 driver.
///
/// Offers two ways of measuring:
///
/// * blocking one-shots ([`pressure`](Self::pressure),
///   [`altitude`](Self::altitude), [`temperature`](Self::temperature)) that
///   trigger a conversion and poll until it is done;
/// * a non-blocking sequencer driven by [`poll`](Self::poll), which cycles
///   through pressure, altitude and temperature one step at a time and caches
///   the results.
pub struct MPL3115A2<I> {
    interface: I,
    config: Config,
    ctrl: Ctrl1,
    sequencer: Sequencer,
}

impl<I2C> MPL3115A2<I2cInterface<I2C>> {
    /// Creates a driver at the fixed bus address with default settings.
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    /// Creates a driver with custom settings.
    pub fn with_config(i2c: I2C, config: Config) -> Self {
        Self::with_interface(I2cInterface::new(i2c, MPL3115A2_ADDRESS), config)
    }

    /// Releases the I²C bus, consuming the driver.
    pub fn release(self) -> I2C {
        self.interface.release()
    }
}

impl<I> MPL3115A2<I> {
    pub(crate) const fn with_interface(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            ctrl: Ctrl1::from_bits(0),
            sequencer: Sequencer::new(),
        }
    }

    pub const fn config(&self) -> Config {
        self.config
    }

    /// Replaces the settings. Oversampling and mode take effect on the next
    /// [`begin`](Self::begin).
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Measurement mode held in the control register image.
    pub const fn mode(&self) -> PressureAlt {
        if self.ctrl.altimeter() {
            PressureAlt::Altitude
        } else {
            PressureAlt::Pressure
        }
    }

    /// Current sequencer state.
    pub const fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Current sequencer state as its raw tag (`0`, `1..=10` or `101..=110`).
    pub const fn raw_state(&self) -> u8 {
        self.sequencer.raw_state()
    }

    /// Whether a full cycle completed since the last [`acknowledge`](Self::acknowledge).
    pub const fn is_new_data(&self) -> bool {
        self.sequencer.is_new_data()
    }

    /// Marks the latest cycle as consumed. The sequencer keeps its phase.
    pub fn acknowledge(&mut self) {
        self.sequencer.acknowledge();
    }

    /// Last pressure decoded by the sequencer, in hPa.
    pub const fn last_pressure(&self) -> f32 {
        self.sequencer.pressure()
    }

    /// Last altitude decoded by the sequencer, in meters.
    pub const fn last_altitude(&self) -> f32 {
        self.sequencer.altitude()
    }

    /// Last temperature decoded by the sequencer, in °C.
    pub const fn last_temperature(&self) -> f32 {
        self.sequencer.temperature()
    }
}

#[maybe_async_cfg::maybe(
    sync(feature = "blocking", keep_self, idents(AsyncDelayNs(sync = "DelayNs"))),
    async(feature = "async", keep_self)
)]
impl<I> MPL3115A2<I>
where
    I: Interface,
{
    /// Checks the chip ID, resets the device and applies the configuration.
    ///
    /// On success the sequencer is armed at its first phase. On failure it is
    /// left uninitialized and [`poll`](Self::poll) does nothing.
    pub async fn begin<D: AsyncDelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I::BusError>> {
        self.sequencer.invalidate();

        let id = self.interface.read_reg(addr::WHO_AM_I).await?;
        if id != DEVICE_ID {
            warn!("unexpected chip id {}", id);
            return Err(Error::UnsupportedChip);
        }

        // The part may reset before it acknowledges this write.
        if self
            .interface
            .write_reg(addr::CTRL_REG1, ctrl1::RST)
            .await
            .is_err()
        {
            debug!("software reset not acknowledged");
        }
        self.wait_for(delay, addr::CTRL_REG1, ctrl1::RST, false)
            .await?;

        let mut ctrl = Ctrl1::default();
        ctrl.set_oversampling_bits(self.config.oversampling.bits());
        ctrl.set_altimeter(self.config.mode == PressureAlt::Altitude);
        self.interface.write_reg(addr::CTRL_REG1, ctrl.bits()).await?;
        self.ctrl = ctrl;

        self.interface
            .write_reg(
                addr::PT_DATA_CFG,
                pt_data_cfg::TDEFE | pt_data_cfg::PDEFE | pt_data_cfg::DREM,
            )
            .await?;

        self.sequencer.start();
        info!("MPL3115A2 initialized");
        Ok(())
    }

    /// Runs the measurement sequencer.
    ///
    /// Call this repeatedly from the main loop. With `quick` unset every call
    /// does a single step; with `quick` set a call keeps going until the
    /// device has to be waited on. Read results with
    /// [`last_pressure`](Self::last_pressure) and friends, and use
    /// [`is_new_data`](Self::is_new_data) to spot a completed cycle.
    pub async fn poll(&mut self, quick: bool) -> Result<(), Error<I::BusError>> {
        self.sequencer
            .poll(&mut self.interface, &mut self.ctrl, quick)
            .await
    }

    /// Blocking pressure measurement in hPa.
    pub async fn pressure<D: AsyncDelayNs>(&mut self, delay: &mut D) -> Result<f32, Error<I::BusError>> {
        self.trigger(delay, Some(PressureAlt::Pressure)).await?;
        self.wait_for(delay, addr::STATUS, status::PDR, true).await?;
        self.last_conversion_results(Measurement::Pressure).await
    }

    /// Blocking altitude measurement in meters.
    pub async fn altitude<D: AsyncDelayNs>(&mut self, delay: &mut D) -> Result<f32, Error<I::BusError>> {
        self.trigger(delay, Some(PressureAlt::Altitude)).await?;
        self.wait_for(delay, addr::STATUS, status::PDR, true).await?;
        self.last_conversion_results(Measurement::Altitude).await
    }

    /// Blocking temperature measurement in °C. Keeps the current mode.
    pub async fn temperature<D: AsyncDelayNs>(&mut self, delay: &mut D) -> Result<f32, Error<I::BusError>> {
        self.trigger(delay, None).await?;
        self.wait_for(delay, addr::STATUS, status::PTDR, true).await?;
        self.last_conversion_results(Measurement::Temperature).await
    }

    /// Selects barometer or altimeter mode without starting a conversion.
    pub async fn set_mode(&mut self, mode: PressureAlt) -> Result<(), Error<I::BusError>> {
        self.ctrl.set_one_shot(false);
        self.ctrl.set_altimeter(mode == PressureAlt::Altitude);
        self.interface
            .write_reg(addr::CTRL_REG1, self.ctrl.bits())
            .await?;
        debug!("mode set, ctrl_reg1 = {}", self.ctrl.bits());
        Ok(())
    }

    /// Starts a one-shot conversion in the current mode.
    pub async fn start_one_shot<D: AsyncDelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I::BusError>> {
        self.trigger(delay, None).await
    }

    /// Whether new pressure/altitude or temperature data is available.
    pub async fn conversion_complete(&mut self) -> Result<bool, Error<I::BusError>> {
        let flags = self.interface.read_reg(addr::STATUS).await?;
        Ok(flags & status::PTDR != 0)
    }

    /// Reads the output registers and decodes `value`.
    ///
    /// Pressure and altitude share the same registers; which one is valid
    /// depends on the mode the last conversion ran in.
    pub async fn last_conversion_results(
        &mut self,
        value: Measurement,
    ) -> Result<f32, Error<I::BusError>> {
        let mut buffer = [0u8; 5];
        self.interface
            .read_regs(addr::OUT_P_MSB, &mut buffer)
            .await?;
        let [p_msb, p_csb, p_lsb, t_msb, t_lsb] = buffer;
        Ok(match value {
            Measurement::Pressure => decode::pressure_from_bytes([p_msb, p_csb, p_lsb]),
            Measurement::Altitude => decode::altitude_from_bytes([p_msb, p_csb, p_lsb]),
            Measurement::Temperature => decode::temperature_from_bytes([t_msb, t_lsb]),
        })
    }

    /// Altitude offset in meters (OFF_H).
    pub async fn altitude_offset(&mut self) -> Result<i8, Error<I::BusError>> {
        let raw = self.interface.read_reg(addr::OFF_H).await?;
        Ok(i8::from_be_bytes([raw]))
    }

    /// Sets the altitude offset in meters (OFF_H).
    pub async fn set_altitude_offset(&mut self, offset: i8) -> Result<(), Error<I::BusError>> {
        self.interface
            .write_reg(addr::OFF_H, offset.to_be_bytes()[0])
            .await
    }

    /// Sets the sea level pressure in hPa used for altitude calculation.
    ///
    /// The register holds 2 Pa per LSB, so values from 0 to about 1310.7 hPa
    /// are accepted.
    pub async fn set_sea_pressure(&mut self, hpa: f32) -> Result<(), Error<I::BusError>> {
        let bar = cast::u16(hpa * 50.0).map_err(|_| Error::InvalidData)?;
        self.interface
            .write_regs(addr::BAR_IN_MSB, &bar.to_be_bytes())
            .await
    }

    /// Waits for the previous one-shot, optionally switches mode, then sets OST.
    async fn trigger<D: AsyncDelayNs>(
        &mut self,
        delay: &mut D,
        mode: Option<PressureAlt>,
    ) -> Result<(), Error<I::BusError>> {
        self.wait_for(delay, addr::CTRL_REG1, ctrl1::OST, false)
            .await?;
        if let Some(mode) = mode {
            self.ctrl.set_altimeter(mode == PressureAlt::Altitude);
        }
        self.ctrl.set_one_shot(true);
        self.interface
            .write_reg(addr::CTRL_REG1, self.ctrl.bits())
            .await
    }

    /// Polls `reg` until the bits in `mask` are all set (`set`) or all clear.
    async fn wait_for<D: AsyncDelayNs>(
        &mut self,
        delay: &mut D,
        reg: u8,
        mask: u8,
        set: bool,
    ) -> Result<(), Error<I::BusError>> {
        for _ in 0..self.config.max_wait_polls {
            let value = self.interface.read_reg(reg).await?;
            let done = if set {
                value & mask == mask
            } else {
                value & mask == 0
            };
            if done {
                return Ok(());
            }
            delay.delay_ms(self.config.poll_interval_ms).await;
        }
        warn!("timed out waiting on register {}", reg);
        Err(Error::Timeout)
    }
}
