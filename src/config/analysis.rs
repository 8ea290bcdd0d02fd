// src/config/analysis.rs
//
// Framing and Mel-cepstrum parameters, loadable from JSON

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::analysis::{FRAMES_PER_SEC, FRAME_STRIDE, MFCC_COUNT};
use crate::error::FrameError;

/// Mel filterbank and cepstrum parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelConfig {
    /// Number of triangular filters
    pub num_filters: usize,
    /// Lower edge of the first filter in Hz
    pub low_freq_hz: f64,
    /// Upper edge of the last filter in Hz (None = Nyquist)
    pub high_freq_hz: Option<f64>,
    /// Cepstral coefficients kept after the DCT
    pub num_coefficients: usize,
    /// Filter energies are clamped to this before taking the log
    pub log_floor: f64,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            num_filters: 26,
            low_freq_hz: 0.0,
            high_freq_hz: None,
            num_coefficients: MFCC_COUNT,
            log_floor: 1e-10,
        }
    }
}

impl MelConfig {
    /// Upper filter edge for a given sample rate
    pub fn high_freq(&self, sample_rate: u32) -> f64 {
        self.high_freq_hz.unwrap_or(sample_rate as f64 / 2.0)
    }

    /// Checks the filter band against a concrete sample rate: the upper edge
    /// must not pass Nyquist and the lower edge must sit below it.
    pub fn check_band(&self, sample_rate: u32) -> Result<(), FrameError> {
        if sample_rate == 0 {
            return Err(FrameError::InvalidConfig("sample rate is 0".into()));
        }
        let nyquist = sample_rate as f64 / 2.0;
        let high = self.high_freq(sample_rate);
        if high > nyquist {
            return Err(FrameError::InvalidConfig(format!(
                "high_freq_hz {} is above Nyquist ({} Hz)",
                high, nyquist
            )));
        }
        if self.low_freq_hz >= high {
            return Err(FrameError::InvalidConfig(format!(
                "low_freq_hz {} must be below the upper edge {} Hz",
                self.low_freq_hz, high
            )));
        }
        Ok(())
    }
}

/// Multi-frame analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples between consecutive frame starts
    pub frame_stride: usize,
    /// Upper bound on frames analysed per container
    pub max_frames: usize,
    /// Run pre-emphasis on a copy of the container before framing
    pub pre_emphasis: bool,
    pub mel: MelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_stride: FRAME_STRIDE,
            max_frames: FRAMES_PER_SEC,
            pre_emphasis: false,
            mel: MelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), FrameError> {
        let mel = &self.mel;
        if self.frame_stride == 0 {
            return Err(FrameError::InvalidConfig("frame_stride must be positive".into()));
        }
        if mel.num_filters == 0 {
            return Err(FrameError::InvalidConfig("num_filters must be positive".into()));
        }
        if mel.num_coefficients == 0 || mel.num_coefficients > MFCC_COUNT {
            return Err(FrameError::InvalidConfig(format!(
                "num_coefficients must be in 1..={}",
                MFCC_COUNT
            )));
        }
        if mel.num_coefficients > mel.num_filters {
            return Err(FrameError::InvalidConfig(format!(
                "{} coefficients from {} filters",
                mel.num_coefficients, mel.num_filters
            )));
        }
        if !(mel.low_freq_hz >= 0.0) {
            return Err(FrameError::InvalidConfig("low_freq_hz must not be negative".into()));
        }
        if let Some(high) = mel.high_freq_hz {
            if mel.low_freq_hz >= high {
                return Err(FrameError::InvalidConfig(format!(
                    "low_freq_hz {} must be below high_freq_hz {}",
                    mel.low_freq_hz, high
                )));
            }
        }
        if !(mel.log_floor > 0.0) {
            return Err(FrameError::InvalidConfig("log_floor must be positive".into()));
        }
        Ok(())
    }

    /// Save config to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config: {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Load config from JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.frame_stride, 110);
        assert_eq!(config.max_frames, 96);
        assert_eq!(config.mel.num_filters, 26);
        assert_eq!(config.mel.num_coefficients, 12);
        assert_eq!(config.mel.high_freq(11025), 5512.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "frame_stride": 256, "mel": { "num_filters": 20 } }"#).unwrap();
        assert_eq!(config.frame_stride, 256);
        assert_eq!(config.mel.num_filters, 20);
        assert_eq!(config.mel.num_coefficients, 12);
        assert_eq!(config.max_frames, 96);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = AnalysisConfig::default();
        config.mel.num_filters = 8;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.frame_stride = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.mel.low_freq_hz = 4000.0;
        config.mel.high_freq_hz = Some(300.0);
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.mel.low_freq_hz = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_band_resolved_against_sample_rate() {
        let mut mel = MelConfig::default();
        assert!(mel.check_band(11025).is_ok());
        assert!(mel.check_band(0).is_err());

        // Nyquist upper edge: a lower edge at or past it leaves no band.
        mel.low_freq_hz = 6000.0;
        assert!(matches!(mel.check_band(11025), Err(FrameError::InvalidConfig(_))));
        mel.low_freq_hz = 5512.5;
        assert!(mel.check_band(11025).is_err());
        assert!(mel.check_band(44100).is_ok());

        let mel = MelConfig {
            high_freq_hz: Some(8000.0),
            ..MelConfig::default()
        };
        assert!(mel.check_band(11025).is_err());
        assert!(mel.check_band(16000).is_ok());
    }
}
