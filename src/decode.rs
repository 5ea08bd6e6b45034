//! Conversion of output register bytes into physical units.
//!
//! The device runs in its standard (non-raw) output format, where the unused
//! low nibble of the pressure and temperature words reads as zero. Pressure is
//! the full 24-bit word in units of 1/64 Pa, so dividing by 6400 yields hPa.
//! Temperature is a signed 16-bit word in units of 1/256 °C.

/// Decodes OUT_P_MSB/CSB/LSB in barometer mode into hPa.
pub fn pressure_from_bytes(bytes: [u8; 3]) -> f32 {
    let raw = u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2]);
    raw as f32 / 6400.0
}

/// Decodes OUT_P_MSB/CSB/LSB in altimeter mode into meters.
///
/// The three bytes form bits 31..8 of a signed Q16.16 value.
pub fn altitude_from_bytes(bytes: [u8; 3]) -> f32 {
    let raw = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], 0]);
    raw as f32 / 65536.0
}

/// Decodes OUT_T_MSB/LSB into °C.
pub fn temperature_from_bytes(bytes: [u8; 2]) -> f32 {
    f32::from(i16::from_be_bytes(bytes)) / 256.0
}
