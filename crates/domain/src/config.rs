use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const MIN_BPM: f64 = 1.0;
pub const MAX_BPM: f64 = 1000.0;

/// Clamps a tempo into `[MIN_BPM, MAX_BPM]` so every beat has a usable,
/// non-zero period. NaN falls back to the minimum.
pub fn clamp_bpm(bpm: f64) -> f64 {
    if bpm.is_nan() {
        MIN_BPM
    } else {
        bpm.clamp(MIN_BPM, MAX_BPM)
    }
}

/// Length of one beat at `bpm`, after clamping.
pub fn beat_period(bpm: f64) -> Duration {
    Duration::from_secs_f64(60.0 / clamp_bpm(bpm))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PracticeConfig {
    pub bpm: f64,
    pub session_seconds: u32,
    pub beats_per_bar: u8,
    pub sound_enabled: bool,
    pub show_diagrams: bool,
    /// How often progress is recomputed while running.
    pub frame_interval_ms: u64,
    pub click_gain: f32,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            bpm: 60.0,
            session_seconds: 60,
            beats_per_bar: 4,
            sound_enabled: true,
            show_diagrams: true,
            frame_interval_ms: 16,
            click_gain: 0.8,
        }
    }
}

impl PracticeConfig {
    /// Clamps values that would break scheduling.
    pub fn sanitized(mut self) -> Self {
        self.bpm = clamp_bpm(self.bpm);
        self.beats_per_bar = self.beats_per_bar.max(1);
        self.frame_interval_ms = self.frame_interval_ms.max(1);
        self.click_gain = if self.click_gain.is_nan() {
            0.0
        } else {
            self.click_gain.clamp(0.0, 1.0)
        };
        self
    }

    pub fn beat_period(&self) -> Duration {
        beat_period(self.bpm)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.session_seconds))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Loads YAML or JSON depending on the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(DomainError::validation(format!(
                "unsupported config format {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_is_clamped() {
        assert_eq!(clamp_bpm(0.0), MIN_BPM);
        assert_eq!(clamp_bpm(-40.0), MIN_BPM);
        assert_eq!(clamp_bpm(f64::NAN), MIN_BPM);
        assert_eq!(clamp_bpm(90.0), 90.0);
        assert_eq!(beat_period(0.0), Duration::from_secs(60));
        assert_eq!(beat_period(120.0), Duration::from_millis(500));
    }

    #[test]
    fn huge_tempos_are_capped() {
        assert_eq!(clamp_bpm(f64::INFINITY), MAX_BPM);
        assert_eq!(clamp_bpm(1e12), MAX_BPM);
        assert_eq!(clamp_bpm(f64::NEG_INFINITY), MIN_BPM);
        assert_eq!(beat_period(f64::INFINITY), Duration::from_millis(60));
        assert_eq!(beat_period(1e12), Duration::from_millis(60));
    }

    #[test]
    fn infinite_yaml_tempo_is_capped() {
        let config = PracticeConfig::from_yaml_str("bpm: .inf\n").unwrap();
        assert_eq!(config.bpm, MAX_BPM);
        assert!(!config.beat_period().is_zero());
    }

    #[test]
    fn sanitized_fixes_invalid_values() {
        let config = PracticeConfig {
            bpm: -3.0,
            beats_per_bar: 0,
            frame_interval_ms: 0,
            click_gain: 4.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.bpm, 1.0);
        assert_eq!(config.beats_per_bar, 1);
        assert_eq!(config.frame_interval_ms, 1);
        assert_eq!(config.click_gain, 1.0);
    }

    #[test]
    fn yaml_fills_defaults() {
        let config = PracticeConfig::from_yaml_str("bpm: 0\nsession_seconds: 30\n").unwrap();
        assert_eq!(config.bpm, 1.0);
        assert_eq!(config.session_duration(), Duration::from_secs(30));
        assert_eq!(config.beats_per_bar, 4);
        assert!(config.sound_enabled);
    }

    #[test]
    fn json_config_parses() {
        let config =
            PracticeConfig::from_json_str(r#"{"bpm": 120, "show_diagrams": false}"#).unwrap();
        assert_eq!(config.beat_period(), Duration::from_millis(500));
        assert!(!config.show_diagrams);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join("fretdrill-config-test.toml");
        std::fs::write(&path, "bpm = 60").unwrap();
        let err = PracticeConfig::load(&path).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let _ = std::fs::remove_file(path);
    }
}
