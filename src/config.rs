use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::devices::{ADC_MAX, OutputTarget};
use crate::error::{AcquisitionError, Result};

/// Configuration for an acquisition run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub port: Option<String>,       // Serial device; stdout when absent
    pub baud_rate: u32,             // Symbol rate of the serial link
    pub period_ms: u64,             // Pause after each record
    pub settle_ms: u64,             // Pause before the header
    pub max_cycles: Option<u64>,    // Stop after this many records; run forever when absent
    pub baselines: [u16; 3],        // Simulated ADC codes for pressure, magnetic, temperature
    pub noise: u16,                 // Simulated ADC jitter in counts
    pub seed: Option<u64>,          // Fixed simulated ADC seed
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 9600,
            period_ms: 100,
            settle_ms: 1000,
            max_cycles: None,
            baselines: [205, 512, 307], // ~1.0 V, ~2.5 V (hall zero-field), ~1.5 V
            noise: 3,
            seed: None,
        }
    }
}

impl AcquisitionConfig {
    /// Load a JSON config file. Keys it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            AcquisitionError::Config(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(AcquisitionError::Config("baud_rate must be non-zero".into()));
        }
        if let Some(code) = self.baselines.iter().find(|&&b| b > ADC_MAX) {
            return Err(AcquisitionError::Config(format!(
                "baseline {} is outside the converter range 0..={}",
                code, ADC_MAX
            )));
        }
        Ok(())
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn output_target(&self) -> OutputTarget {
        match &self.port {
            Some(port) => OutputTarget::Serial {
                port: port.clone(),
                baud_rate: self.baud_rate,
            },
            None => OutputTarget::Stdout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_reference_setup() {
        let config = AcquisitionConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.period(), Duration::from_millis(100));
        assert_eq!(config.settle_delay(), Duration::from_millis(1000));
        assert_eq!(config.max_cycles, None);
        assert_eq!(config.output_target(), OutputTarget::Stdout);
    }

    #[test]
    fn file_overrides_only_named_keys() {
        let file = write_config(r#"{ "port": "/dev/ttyACM0", "period_ms": 250 }"#);
        let config = AcquisitionConfig::load(file.path()).unwrap();
        assert_eq!(config.period_ms, 250);
        assert_eq!(config.settle_ms, 1000);
        assert_eq!(
            config.output_target(),
            OutputTarget::Serial {
                port: "/dev/ttyACM0".to_string(),
                baud_rate: 9600
            }
        );
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let file = write_config("{ period_ms: ");
        let err = AcquisitionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, AcquisitionError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AcquisitionConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AcquisitionError::Io(_)));
    }

    #[test]
    fn rejects_zero_baud_and_out_of_range_baseline() {
        let zero_baud = AcquisitionConfig {
            baud_rate: 0,
            ..Default::default()
        };
        assert!(zero_baud.validate().is_err());

        let file = write_config(r#"{ "baselines": [100, 2000, 100] }"#);
        assert!(matches!(
            AcquisitionConfig::load(file.path()),
            Err(AcquisitionError::Config(_))
        ));
    }
}
