use std::time::Instant;

use fretdrill_trainer::SessionController;
use tracing::debug;

/// Tempo change for one `+` or `-`.
pub const BPM_STEP: f64 = 5.0;

pub const HELP: &str = "type then Enter: p pause/resume, m mute, + faster, - slower, d diagrams, q quit";

/// A command typed while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    ToggleSound,
    Faster,
    Slower,
    ToggleDiagrams,
    Quit,
}

impl Control {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "p" | "" => Some(Self::TogglePause),
            "m" => Some(Self::ToggleSound),
            "+" | "=" => Some(Self::Faster),
            "-" | "_" => Some(Self::Slower),
            "d" => Some(Self::ToggleDiagrams),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Presentation toggles that live outside the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_diagrams: bool,
}

/// Applies `control` to the running session. Tempo changes land on the next
/// beat; mute is read on every beat.
pub fn apply(control: Control, clock: &mut SessionController, view: &mut ViewOptions, now: Instant) {
    match control {
        Control::TogglePause => clock.toggle(now),
        Control::ToggleSound => clock.set_sound_enabled(!clock.sound_enabled()),
        Control::Faster => clock.set_bpm(clock.bpm() + BPM_STEP),
        Control::Slower => clock.set_bpm(clock.bpm() - BPM_STEP),
        Control::ToggleDiagrams => view.show_diagrams = !view.show_diagrams,
        Control::Quit => clock.stop(),
    }
    debug!(?control, bpm = clock.bpm(), phase = ?clock.phase(), "control applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use fretdrill_audio::NullClick;
    use fretdrill_domain::{PracticeConfig, MIN_BPM};
    use fretdrill_trainer::ClockPhase;

    fn clock(bpm: f64) -> SessionController {
        let config = PracticeConfig {
            bpm,
            session_seconds: 30,
            ..Default::default()
        };
        SessionController::new(&config, Box::new(NullClick))
    }

    #[test]
    fn parses_single_key_commands() {
        assert_eq!(Control::parse("p\n"), Some(Control::TogglePause));
        assert_eq!(Control::parse(""), Some(Control::TogglePause));
        assert_eq!(Control::parse(" m "), Some(Control::ToggleSound));
        assert_eq!(Control::parse("+"), Some(Control::Faster));
        assert_eq!(Control::parse("-"), Some(Control::Slower));
        assert_eq!(Control::parse("d"), Some(Control::ToggleDiagrams));
        assert_eq!(Control::parse("q"), Some(Control::Quit));
        assert_eq!(Control::parse("x"), None);
    }

    #[test]
    fn pause_and_resume_keep_the_countdown() {
        let mut clock = clock(60.0);
        let mut view = ViewOptions { show_diagrams: true };
        let t0 = Instant::now();
        clock.start(t0);
        apply(Control::TogglePause, &mut clock, &mut view, t0);
        assert_eq!(clock.phase(), ClockPhase::Paused);
        assert_eq!(clock.next_deadline(), None);
        apply(Control::TogglePause, &mut clock, &mut view, t0);
        assert!(clock.is_running());
        assert!(clock.next_deadline().is_some());
    }

    #[test]
    fn mute_tempo_and_diagrams_change_live() {
        let mut clock = clock(60.0);
        let mut view = ViewOptions { show_diagrams: true };
        let now = Instant::now();
        clock.start(now);

        apply(Control::ToggleSound, &mut clock, &mut view, now);
        assert!(!clock.sound_enabled());
        apply(Control::ToggleSound, &mut clock, &mut view, now);
        assert!(clock.sound_enabled());

        apply(Control::Faster, &mut clock, &mut view, now);
        assert_eq!(clock.bpm(), 65.0);
        apply(Control::ToggleDiagrams, &mut clock, &mut view, now);
        assert!(!view.show_diagrams);
    }

    #[test]
    fn slowing_down_stops_at_the_minimum() {
        let mut clock = clock(3.0);
        let mut view = ViewOptions { show_diagrams: false };
        apply(Control::Slower, &mut clock, &mut view, Instant::now());
        assert_eq!(clock.bpm(), MIN_BPM);
    }

    #[test]
    fn quit_stops_the_clock() {
        let mut clock = clock(60.0);
        let mut view = ViewOptions { show_diagrams: true };
        let now = Instant::now();
        clock.start(now);
        apply(Control::Quit, &mut clock, &mut view, now);
        assert!(!clock.is_running());
    }
}
