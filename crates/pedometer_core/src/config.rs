use crate::TrackerError;
use crate::engine::STEP_THRESHOLD;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_FILE: &str = "pedometer_data.json";
pub const SENSOR_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const SIMULATION_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const TIMER_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceMode {
    Simulated,
    Sensor,
}

impl SourceMode {
    pub fn poll_interval(self) -> Duration {
        match self {
            SourceMode::Simulated => SIMULATION_POLL_INTERVAL,
            SourceMode::Sensor => SENSOR_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data_file: PathBuf,
    pub source: SourceMode,
    pub sensor_replay: Option<PathBuf>,
    pub seed: Option<u64>,
    pub step_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            source: SourceMode::Simulated,
            sensor_replay: None,
            seed: None,
            step_threshold: STEP_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, TrackerError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let data_file = get("PEDOMETER_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let source = match get("PEDOMETER_SOURCE").as_deref().map(str::trim) {
            None | Some("") | Some("simulated") => SourceMode::Simulated,
            Some("sensor") => SourceMode::Sensor,
            Some(other) => {
                return Err(TrackerError::Config(format!(
                    "PEDOMETER_SOURCE must be 'simulated' or 'sensor', got '{other}'"
                )));
            }
        };
        let sensor_replay = get("PEDOMETER_SENSOR_REPLAY").map(PathBuf::from);
        let seed = get("PEDOMETER_SEED")
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| TrackerError::Config(format!("PEDOMETER_SEED: {e}")))
            })
            .transpose()?;
        let step_threshold = match get("PEDOMETER_STEP_THRESHOLD") {
            Some(s) => {
                let v = s
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| TrackerError::Config(format!("PEDOMETER_STEP_THRESHOLD: {e}")))?;
                if !v.is_finite() || v <= 0.0 {
                    return Err(TrackerError::Config(
                        "PEDOMETER_STEP_THRESHOLD must be a positive number".into(),
                    ));
                }
                v
            }
            None => STEP_THRESHOLD,
        };
        Ok(Self {
            data_file,
            source,
            sensor_replay,
            seed,
            step_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults() {
        let cfg = Config::from_env_with(|_| None).expect("cfg");
        assert_eq!(cfg.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(cfg.source, SourceMode::Simulated);
        assert_eq!(cfg.step_threshold, 12.0);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "PEDOMETER_DATA_FILE" => Some("/tmp/steps.json".into()),
            "PEDOMETER_SOURCE" => Some("sensor".into()),
            "PEDOMETER_SENSOR_REPLAY" => Some("walk.csv".into()),
            "PEDOMETER_SEED" => Some("42".into()),
            "PEDOMETER_STEP_THRESHOLD" => Some("11.5".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.data_file, PathBuf::from("/tmp/steps.json"));
        assert_eq!(cfg.source, SourceMode::Sensor);
        assert_eq!(cfg.sensor_replay, Some(PathBuf::from("walk.csv")));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.step_threshold, 11.5);
        assert_eq!(cfg.source.poll_interval(), SENSOR_POLL_INTERVAL);
    }

    #[test]
    fn from_env_rejects_bad_seed() {
        let get = |k: &str| (k == "PEDOMETER_SEED").then(|| "abc".to_string());
        assert!(matches!(
            Config::from_env_with(get),
            Err(TrackerError::Config(_))
        ));
    }

    #[test]
    fn from_env_rejects_unknown_source() {
        let get = |k: &str| (k == "PEDOMETER_SOURCE").then(|| "gps".to_string());
        assert!(Config::from_env_with(get).is_err());
    }
}
