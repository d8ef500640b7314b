//! Step counting.
//!
//! A [`PedometerEngine`] owns a [`StepSource`] and a monotonically increasing
//! step counter. The caller drives it with [`PedometerEngine::tick`] on a fixed
//! interval; ticks are ignored while the engine is idle.
//!
//! Two sources exist:
//! - [`SensorSteps`]: edge-triggered threshold detector over the acceleration
//!   magnitude. It registers one step when the magnitude rises above the
//!   threshold and re-arms once it falls back below. It is not a peak-to-peak
//!   detector: gait peaks that never clear the threshold are missed and jitter
//!   around the threshold counts several times. That is its known accuracy.
//! - [`SimulatedSteps`]: random increments for running without hardware.

use crate::TrackerResult;
use crate::sensor::{Acceleration, Accelerometer};
use rand::Rng;
use tracing::{debug, warn};

/// Acceleration magnitude (m/s²) above which a step is registered.
pub const STEP_THRESHOLD: f64 = 12.0;
/// Chance that a simulated tick produces steps.
pub const SIMULATED_STEP_PROBABILITY: f64 = 0.7;
pub const SIMULATED_MIN_STEPS: u32 = 1;
pub const SIMULATED_MAX_STEPS: u32 = 3;

/// Anything that can report how many new steps happened since the last poll.
pub trait StepSource: Send {
    fn poll_steps(&mut self) -> TrackerResult<u32>;

    /// Clear detector state kept between polls.
    fn reset(&mut self) {}
}

impl<S: StepSource + ?Sized> StepSource for Box<S> {
    fn poll_steps(&mut self) -> TrackerResult<u32> {
        (**self).poll_steps()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

#[derive(Clone, Debug)]
pub struct PeakDetector {
    threshold: f64,
    last_magnitude: f64,
    step_detected: bool,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new(STEP_THRESHOLD)
    }
}

impl PeakDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_magnitude: 0.0,
            step_detected: false,
        }
    }

    /// Feed one sample; returns true when it registers a step.
    pub fn process(&mut self, sample: Acceleration) -> bool {
        let magnitude = sample.magnitude();
        let mut stepped = false;
        if magnitude > self.threshold && !self.step_detected {
            if self.last_magnitude < magnitude {
                self.step_detected = true;
                stepped = true;
            }
        } else if magnitude < self.threshold {
            self.step_detected = false;
        }
        self.last_magnitude = magnitude;
        stepped
    }

    pub fn reset(&mut self) {
        self.last_magnitude = 0.0;
        self.step_detected = false;
    }
}

/// Steps detected from a live (or replayed) accelerometer.
pub struct SensorSteps<A> {
    sensor: A,
    detector: PeakDetector,
}

impl<A: Accelerometer> SensorSteps<A> {
    pub fn new(sensor: A, threshold: f64) -> Self {
        Self {
            sensor,
            detector: PeakDetector::new(threshold),
        }
    }
}

impl<A: Accelerometer> StepSource for SensorSteps<A> {
    fn poll_steps(&mut self) -> TrackerResult<u32> {
        match self.sensor.read()? {
            Some(sample) => Ok(u32::from(self.detector.process(sample))),
            None => Ok(0),
        }
    }

    fn reset(&mut self) {
        self.detector.reset();
    }
}

/// With probability [`SIMULATED_STEP_PROBABILITY`] adds 1..=3 steps per poll.
pub struct SimulatedSteps<R> {
    rng: R,
}

impl<R: Rng + Send> SimulatedSteps<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> StepSource for SimulatedSteps<R> {
    fn poll_steps(&mut self) -> TrackerResult<u32> {
        if self.rng.random::<f64>() > 1.0 - SIMULATED_STEP_PROBABILITY {
            Ok(self
                .rng
                .random_range(SIMULATED_MIN_STEPS..=SIMULATED_MAX_STEPS))
        } else {
            Ok(0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active,
}

/// Result of one scheduler tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine is not running; the source was not polled.
    Idle,
    /// Polled, nothing new.
    NoStep,
    /// New steps; carries the running total.
    Stepped { total: u64, added: u32 },
    /// The source failed; treated as "no sample this tick".
    Degraded,
}

pub struct PedometerEngine<S> {
    source: S,
    state: EngineState,
    step_count: u64,
    degraded_ticks: u64,
}

impl<S: StepSource> PedometerEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: EngineState::Idle,
            step_count: 0,
            degraded_ticks: 0,
        }
    }

    /// Continue counting from a previously stored total.
    pub fn resume_from(mut self, steps: u64) -> Self {
        self.step_count = steps;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EngineState::Active
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn degraded_ticks(&self) -> u64 {
        self.degraded_ticks
    }

    pub fn start(&mut self) {
        self.state = EngineState::Active;
    }

    pub fn stop(&mut self) {
        self.state = EngineState::Idle;
    }

    pub fn toggle(&mut self) -> EngineState {
        match self.state {
            EngineState::Idle => self.start(),
            EngineState::Active => self.stop(),
        }
        self.state
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state == EngineState::Idle {
            return TickOutcome::Idle;
        }
        match self.source.poll_steps() {
            Ok(0) => TickOutcome::NoStep,
            Ok(added) => {
                self.step_count += u64::from(added);
                metrics::counter!("pedometer_steps_detected_total").increment(u64::from(added));
                debug!(added, total = self.step_count, "steps detected");
                TickOutcome::Stepped {
                    total: self.step_count,
                    added,
                }
            }
            Err(e) => {
                self.degraded_ticks += 1;
                metrics::counter!("pedometer_sensor_degraded_total").increment(1);
                if self.degraded_ticks == 1 {
                    warn!(error = %e, "step source unavailable; counting paused");
                } else {
                    debug!(error = %e, ticks = self.degraded_ticks, "step source still unavailable");
                }
                TickOutcome::Degraded
            }
        }
    }

    /// Zero the counter and the detector. Returns the new total (always 0).
    pub fn reset(&mut self) -> u64 {
        self.step_count = 0;
        self.source.reset();
        self.step_count
    }

    /// Overwrite the running total, e.g. after a day boundary.
    pub fn rebase(&mut self, steps: u64) {
        self.step_count = steps;
    }
}
