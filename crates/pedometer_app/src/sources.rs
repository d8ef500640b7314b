//! Step source selection from configuration.

use pedometer_core::config::{Config, SourceMode};
use pedometer_core::engine::{SensorSteps, SimulatedSteps};
use pedometer_core::sensor::{ReplayAccelerometer, UnavailableAccelerometer};
use pedometer_core::{StepSource, TrackerResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

pub type BoxedStepSource = Box<dyn StepSource>;

pub fn step_source_from_config(config: &Config) -> TrackerResult<BoxedStepSource> {
    match config.source {
        SourceMode::Simulated => {
            let rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            info!(seed = ?config.seed, "using simulated step source");
            Ok(Box::new(SimulatedSteps::new(rng)))
        }
        SourceMode::Sensor => match &config.sensor_replay {
            Some(path) => {
                let replay = ReplayAccelerometer::from_file(path)?;
                info!(
                    path = %path.display(),
                    samples = replay.remaining(),
                    "replaying recorded accelerometer samples"
                );
                Ok(Box::new(SensorSteps::new(replay, config.step_threshold)))
            }
            None => {
                warn!("no accelerometer available; steps will not be counted");
                Ok(Box::new(SensorSteps::new(
                    UnavailableAccelerometer,
                    config.step_threshold,
                )))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn replay_file_drives_sensor_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,0,9.8\n0,0,13.0\n0,0,9.0\n0,0,14.0").unwrap();
        let config = Config {
            source: SourceMode::Sensor,
            sensor_replay: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        let mut source = step_source_from_config(&config).unwrap();
        let steps: Vec<u32> = (0..5).map(|_| source.poll_steps().unwrap()).collect();
        assert_eq!(steps, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn missing_replay_file_is_an_error() {
        let config = Config {
            source: SourceMode::Sensor,
            sensor_replay: Some("/definitely/not/here.csv".into()),
            ..Config::default()
        };
        assert!(step_source_from_config(&config).is_err());
    }

    #[test]
    fn sensor_without_hardware_degrades() {
        let config = Config {
            source: SourceMode::Sensor,
            ..Config::default()
        };
        let mut source = step_source_from_config(&config).unwrap();
        assert!(source.poll_steps().is_err());
    }
}
