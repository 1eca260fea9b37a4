use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Level the click envelope decays to by the end of the tone.
const DECAY_FLOOR: f32 = 1e-5;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClickTone {
    pub downbeat_hz: f32,
    pub beat_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

impl Default for ClickTone {
    fn default() -> Self {
        Self {
            downbeat_hz: 880.0,
            beat_hz: 440.0,
            duration_ms: 100,
            gain: 0.8,
        }
    }
}

impl ClickTone {
    pub fn with_gain(gain: f32) -> Self {
        Self {
            gain: gain.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn frequency(&self, downbeat: bool) -> f32 {
        if downbeat {
            self.downbeat_hz
        } else {
            self.beat_hz
        }
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.duration_ms as u64 * sample_rate as u64 / 1000) as usize
    }

    /// Mono click: a sine with an exponential decay down to `DECAY_FLOOR`.
    pub fn synthesize(&self, sample_rate: u32, downbeat: bool) -> Vec<f32> {
        let total = self.sample_count(sample_rate);
        if total == 0 {
            return Vec::new();
        }
        let freq = self.frequency(downbeat);
        let sr = sample_rate as f32;
        let gain = self.gain.clamp(0.0, 1.0);
        (0..total)
            .map(|n| {
                let progress = n as f32 / total as f32;
                let envelope = DECAY_FLOOR.powf(progress);
                (2.0 * PI * freq * n as f32 / sr).sin() * envelope * gain
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|pair| pair[0].signum() != pair[1].signum())
            .count()
    }

    #[test]
    fn click_length_follows_sample_rate() {
        let tone = ClickTone::default();
        assert_eq!(tone.synthesize(48_000, true).len(), 4_800);
        assert_eq!(tone.synthesize(44_100, false).len(), 4_410);
        assert!(tone.synthesize(0, false).is_empty());
    }

    #[test]
    fn downbeat_is_higher_pitched() {
        let tone = ClickTone::default();
        let high = tone.synthesize(48_000, true);
        let low = tone.synthesize(48_000, false);
        assert!(zero_crossings(&high) > zero_crossings(&low) * 3 / 2);
    }

    #[test]
    fn envelope_decays_and_respects_gain() {
        let tone = ClickTone::with_gain(0.5);
        let samples = tone.synthesize(48_000, false);
        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak <= 0.5 + 1e-6);
        let tail = samples[samples.len() - 100..]
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(tail < 0.01);
        assert_abs_diff_eq!(samples[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn silent_gain_is_silent() {
        let tone = ClickTone::with_gain(0.0);
        assert!(tone.synthesize(8_000, true).iter().all(|s| *s == 0.0));
    }
}
