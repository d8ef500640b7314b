//! Accelerometer collaborators.

use crate::{TrackerError, TrackerResult};
use std::collections::VecDeque;
use std::path::Path;

/// A 3-axis acceleration sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Source of acceleration samples.
///
/// `Ok(None)` means the sensor is present but its components are not set yet
/// (typical right after start-up). `Err(SensorUnavailable)` means there is no
/// usable sensor at all.
pub trait Accelerometer: Send {
    fn read(&mut self) -> TrackerResult<Option<Acceleration>>;
}

/// Stand-in for platforms without an accelerometer.
#[derive(Clone, Debug, Default)]
pub struct UnavailableAccelerometer;

impl Accelerometer for UnavailableAccelerometer {
    fn read(&mut self) -> TrackerResult<Option<Acceleration>> {
        Err(TrackerError::SensorUnavailable(
            "no accelerometer on this platform".into(),
        ))
    }
}

/// Plays back recorded samples, one per read. Once exhausted it keeps
/// reporting "no sample".
#[derive(Clone, Debug, Default)]
pub struct ReplayAccelerometer {
    samples: VecDeque<Option<Acceleration>>,
}

impl ReplayAccelerometer {
    pub fn new(samples: impl IntoIterator<Item = Option<Acceleration>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Parse `x,y,z` records, one per line. A `-` record stands for an unset
    /// sample; blank lines are skipped.
    pub fn parse(text: &str) -> TrackerResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let mut samples = VecDeque::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| TrackerError::Config(format!("replay: {e}")))?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() == 1 && matches!(&record[0], "-" | "") {
                samples.push_back(None);
                continue;
            }
            let (x, y, z) = record.deserialize::<(f64, f64, f64)>(None).map_err(|e| {
                TrackerError::Config(format!("replay line {line}: expected 'x,y,z': {e}"))
            })?;
            samples.push_back(Some(Acceleration::new(x, y, z)));
        }
        Ok(Self { samples })
    }

    pub fn from_file(path: &Path) -> TrackerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::SensorUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text)
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl Accelerometer for ReplayAccelerometer {
    fn read(&mut self) -> TrackerResult<Option<Acceleration>> {
        Ok(self.samples.pop_front().flatten())
    }
}
