#![doc = include_str!("../README.md")]
#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

// This must go first so the logging macros are visible to the other modules.
mod fmt;

mod config;
mod decode;
mod device_impl;
mod interface;
mod reg;
mod sequencer;

#[cfg(all(test, feature = "blocking"))]
mod testing;

/// Driver errors, generic over the bus error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I²C bus error
    I2c(E),
    /// Value does not fit the register it is written to
    InvalidData,
    /// Chip ID doesn't match the expected value
    UnsupportedChip,
    /// A blocking wait ran out of polls before the device became ready
    Timeout,
}

/// Pressure or Altitude Mode
///
/// Toggle as required
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressureAlt {
    Pressure,
    Altitude,
}

/// Quantity decoded from the output registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Measurement {
    /// Barometric pressure in hPa.
    Pressure,
    /// Altitude in meters.
    Altitude,
    /// Temperature in °C.
    Temperature,
}

pub use config::{Config, Oversampling};
pub use decode::{altitude_from_bytes, pressure_from_bytes, temperature_from_bytes};
pub use device_impl::MPL3115A2;
pub use interface::{I2cInterface, Interface};
pub use reg::MPL3115A2_ADDRESS;
pub use sequencer::{Phase, SequencerState};

#[cfg(all(feature = "blocking", feature = "async"))]
compile_error!("Cannot enable both blocking and async features");

#[cfg(not(any(feature = "blocking", feature = "async")))]
compile_error!("One of the blocking and async features must be enabled");

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");
