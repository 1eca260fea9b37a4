use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fretdrill_domain::PracticeConfig;
use tracing::{debug, info};

/// `<config dir>/fretdrill/config.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    let base = dirs::config_dir()?;
    Some(base.join("fretdrill").join("config.yaml"))
}

/// An explicit path must load; the default path is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<PracticeConfig> {
    if let Some(path) = explicit {
        return PracticeConfig::load(path)
            .with_context(|| format!("load config {:?}", path));
    }
    match default_config_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "using config file");
            PracticeConfig::load(&path).with_context(|| format!("load config {:?}", path))
        }
        _ => {
            debug!("no config file, using defaults");
            Ok(PracticeConfig::default())
        }
    }
}

/// Command line values that win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub bpm: Option<f64>,
    pub seconds: Option<u32>,
    pub beats_per_bar: Option<u8>,
    pub mute: bool,
    pub hide_diagrams: bool,
}

impl Overrides {
    pub fn apply(&self, mut config: PracticeConfig) -> PracticeConfig {
        if let Some(bpm) = self.bpm {
            config.bpm = bpm;
        }
        if let Some(seconds) = self.seconds {
            config.session_seconds = seconds;
        }
        if let Some(beats) = self.beats_per_bar {
            config.beats_per_bar = beats;
        }
        if self.mute {
            config.sound_enabled = false;
        }
        if self.hide_diagrams {
            config.show_diagrams = false;
        }
        config.sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_are_clamped() {
        let overrides = Overrides {
            bpm: Some(0.0),
            seconds: Some(30),
            beats_per_bar: Some(3),
            mute: true,
            hide_diagrams: false,
        };
        let config = overrides.apply(PracticeConfig::default());
        assert_eq!(config.bpm, 1.0);
        assert_eq!(config.session_seconds, 30);
        assert_eq!(config.beats_per_bar, 3);
        assert!(!config.sound_enabled);
        assert!(config.show_diagrams);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("does-not-exist.yaml"))).is_err());
    }

    #[test]
    fn explicit_config_loads() {
        let path = std::env::temp_dir().join("fretdrill-terminal-settings.yaml");
        std::fs::write(&path, "bpm: 72\nshow_diagrams: false\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.bpm, 72.0);
        assert!(!config.show_diagrams);
        let _ = std::fs::remove_file(path);
    }
}
