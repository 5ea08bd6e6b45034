//! Non-blocking measurement sequencer.
//!
//! One measurement cycle is split into ten phases. Each call to
//! [`Sequencer::poll`] runs the current phase and returns as soon as the
//! device would make the caller wait, so conversion time is spent in the
//! caller's loop instead of inside the driver.
//!
//! The state is kept as a raw tag:
//! `0` before a successful `begin`, `1..=10` while no unacknowledged cycle
//! has completed, and `101..=110` once one has. The phase is always
//! `state % 100`.

use crate::interface::Interface;
use crate::reg::{addr, status, Ctrl1};
use crate::{decode, Error};

const UNINITIALIZED: u8 = 0;
const ACTIVE_BAND: u8 = 0;
const FRESH_BAND: u8 = 100;

/// One step of the measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    /// Wait for a previous one-shot to finish before a pressure conversion.
    PressureIdle = 1,
    /// Select barometer mode and trigger a one-shot.
    PressureTrigger = 2,
    /// Wait for pressure data ready.
    PressureReady = 3,
    /// Read and decode the pressure registers.
    PressureRead = 4,
    /// Wait for the pressure one-shot to finish.
    AltitudeIdle = 5,
    /// Select altimeter mode and trigger a one-shot.
    AltitudeTrigger = 6,
    /// Wait for altitude data ready.
    AltitudeReady = 7,
    /// Read and decode the altitude registers.
    AltitudeRead = 8,
    /// Wait for temperature data ready.
    TemperatureReady = 9,
    /// Read and decode the temperature registers, completing the cycle.
    TemperatureRead = 10,
}

impl Phase {
    const fn from_offset(offset: u8) -> Option<Self> {
        Some(match offset {
            1 => Self::PressureIdle,
            2 => Self::PressureTrigger,
            3 => Self::PressureReady,
            4 => Self::PressureRead,
            5 => Self::AltitudeIdle,
            6 => Self::AltitudeTrigger,
            7 => Self::AltitudeReady,
            8 => Self::AltitudeRead,
            9 => Self::TemperatureReady,
            10 => Self::TemperatureRead,
            _ => return None,
        })
    }

    /// Position of the phase within the cycle, `1..=10`.
    pub const fn offset(self) -> u8 {
        self as u8
    }
}

/// Decoded sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// `begin` has not succeeded yet.
    Uninitialized,
    /// Mid-cycle, no unacknowledged reading.
    Active(Phase),
    /// Mid-cycle, a completed reading has not been acknowledged.
    Fresh(Phase),
}

impl SequencerState {
    /// Decodes a raw state tag. Returns `None` for values outside
    /// `0`, `1..=10` and `101..=110`.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if raw == UNINITIALIZED {
            return Some(Self::Uninitialized);
        }
        let band = raw - raw % 100;
        let phase = match Phase::from_offset(raw % 100) {
            Some(phase) => phase,
            None => return None,
        };
        match band {
            ACTIVE_BAND => Some(Self::Active(phase)),
            FRESH_BAND => Some(Self::Fresh(phase)),
            _ => None,
        }
    }

    /// Raw state tag.
    pub const fn raw(self) -> u8 {
        match self {
            Self::Uninitialized => UNINITIALIZED,
            Self::Active(phase) => ACTIVE_BAND + phase.offset(),
            Self::Fresh(phase) => FRESH_BAND + phase.offset(),
        }
    }

    /// Phase about to run, if initialized.
    pub const fn phase(self) -> Option<Phase> {
        match self {
            Self::Uninitialized => None,
            Self::Active(phase) | Self::Fresh(phase) => Some(phase),
        }
    }
}

/// Outcome of running a single phase.
enum Step {
    /// Precondition not met; stay in the current phase.
    Wait,
    /// Move to the given phase.
    Advance(Phase),
    /// Temperature decoded; start over flagged fresh.
    Complete,
}

/// Sequencer state tag plus the last decoded values.
///
/// The three values are written as their phases complete, so while a cycle
/// is running pressure may already belong to the new cycle while altitude and
/// temperature still belong to the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Sequencer {
    state: u8,
    pressure: f32,
    altitude: f32,
    temperature: f32,
}

impl Sequencer {
    pub(crate) const fn new() -> Self {
        Self {
            state: UNINITIALIZED,
            pressure: 0.0,
            altitude: 0.0,
            temperature: 0.0,
        }
    }

    /// Arms the sequencer at the first phase after a successful `begin`.
    pub(crate) fn start(&mut self) {
        self.state = ACTIVE_BAND + Phase::PressureIdle.offset();
    }

    pub(crate) fn invalidate(&mut self) {
        self.state = UNINITIALIZED;
    }

    pub(crate) const fn raw_state(&self) -> u8 {
        self.state
    }

    pub(crate) const fn state(&self) -> SequencerState {
        match SequencerState::from_raw(self.state) {
            Some(state) => state,
            None => SequencerState::Uninitialized,
        }
    }

    pub(crate) const fn is_new_data(&self) -> bool {
        matches!(self.state(), SequencerState::Fresh(_))
    }

    /// Moves a fresh state back to the active band, keeping the phase.
    pub(crate) fn acknowledge(&mut self) {
        if let SequencerState::Fresh(phase) = self.state() {
            self.state = SequencerState::Active(phase).raw();
        }
    }

    pub(crate) const fn pressure(&self) -> f32 {
        self.pressure
    }

    pub(crate) const fn altitude(&self) -> f32 {
        self.altitude
    }

    pub(crate) const fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[maybe_async_cfg::maybe(
    sync(feature = "blocking", keep_self),
    async(feature = "async", keep_self)
)]
impl Sequencer {
    /// Runs the current phase.
    ///
    /// With `quick` unset, at most one phase is run per call. With `quick`
    /// set, phases keep running until one has to wait or the cycle completes.
    /// The temperature read always follows its ready check in the same call.
    ///
    /// A bus error leaves the state at the phase that failed.
    pub(crate) async fn poll<I: Interface>(
        &mut self,
        interface: &mut I,
        ctrl: &mut Ctrl1,
        quick: bool,
    ) -> Result<(), Error<I::BusError>> {
        let Some(state) = SequencerState::from_raw(self.state) else {
            warn!("invalid sequencer state {}, resetting", self.state);
            self.state = UNINITIALIZED;
            return Ok(());
        };
        let (band, mut phase) = match state {
            SequencerState::Uninitialized => return Ok(()),
            SequencerState::Active(phase) => (ACTIVE_BAND, phase),
            SequencerState::Fresh(phase) => (FRESH_BAND, phase),
        };

        loop {
            match self.run_phase(interface, ctrl, phase).await? {
                Step::Wait => return Ok(()),
                Step::Advance(next) => {
                    self.state = band + next.offset();
                    if !quick && next != Phase::TemperatureRead {
                        return Ok(());
                    }
                    phase = next;
                }
                Step::Complete => {
                    self.state = FRESH_BAND + Phase::PressureIdle.offset();
                    debug!(
                        "cycle complete: {} hPa, {} m, {} C",
                        self.pressure,
                        self.altitude,
                        self.temperature
                    );
                    return Ok(());
                }
            }
        }
    }

    async fn run_phase<I: Interface>(
        &mut self,
        interface: &mut I,
        ctrl: &mut Ctrl1,
        phase: Phase,
    ) -> Result<Step, Error<I::BusError>> {
        let step = match phase {
            Phase::PressureIdle | Phase::AltitudeIdle => {
                let current = Ctrl1::from_bits(interface.read_reg(addr::CTRL_REG1).await?);
                if current.one_shot() {
                    Step::Wait
                } else {
                    Step::Advance(next_phase(phase))
                }
            }
            Phase::PressureTrigger | Phase::AltitudeTrigger => {
                ctrl.set_one_shot(false);
                ctrl.set_altimeter(phase == Phase::AltitudeTrigger);
                interface.write_reg(addr::CTRL_REG1, ctrl.bits()).await?;
                ctrl.set_one_shot(true);
                interface.write_reg(addr::CTRL_REG1, ctrl.bits()).await?;
                Step::Advance(next_phase(phase))
            }
            Phase::PressureReady | Phase::AltitudeReady => {
                let flags = interface.read_reg(addr::STATUS).await?;
                if flags & status::PDR != 0 {
                    Step::Advance(next_phase(phase))
                } else {
                    Step::Wait
                }
            }
            Phase::TemperatureReady => {
                let flags = interface.read_reg(addr::STATUS).await?;
                if flags & status::TDR != 0 {
                    Step::Advance(Phase::TemperatureRead)
                } else {
                    Step::Wait
                }
            }
            Phase::PressureRead => {
                let mut buffer = [0u8; 3];
                interface.read_regs(addr::OUT_P_MSB, &mut buffer).await?;
                self.pressure = decode::pressure_from_bytes(buffer);
                Step::Advance(Phase::AltitudeIdle)
            }
            Phase::AltitudeRead => {
                let mut buffer = [0u8; 3];
                interface.read_regs(addr::OUT_P_MSB, &mut buffer).await?;
                self.altitude = decode::altitude_from_bytes(buffer);
                Step::Advance(Phase::TemperatureReady)
            }
            Phase::TemperatureRead => {
                let mut buffer = [0u8; 2];
                interface.read_regs(addr::OUT_T_MSB, &mut buffer).await?;
                self.temperature = decode::temperature_from_bytes(buffer);
                Step::Complete
            }
        };
        Ok(step)
    }
}

const fn next_phase(phase: Phase) -> Phase {
    match Phase::from_offset(phase.offset() + 1) {
        Some(next) => next,
        None => Phase::PressureIdle,
    }
}
