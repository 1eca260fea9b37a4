use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fretdrill_audio::ClickSink;
use fretdrill_domain::{beat_period, clamp_bpm, PracticeConfig};

use crate::timer::{Missed, TimerHandle, TimerQueue};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClockPhase {
    /// Not started since the last reset.
    Idle,
    Running,
    /// Stopped mid-session; counters are kept.
    Paused,
    /// Countdown reached zero. Only `reset` leaves this phase.
    Finished,
}

/// Read-only snapshot of the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub phase: ClockPhase,
    pub beat_index: u8,
    /// Sub-beat progress in percent.
    pub progress: f64,
    pub time_remaining: Duration,
    pub is_running: bool,
    pub is_finished: bool,
    pub bpm: f64,
    pub sound_enabled: bool,
}

impl SessionState {
    /// Remaining time rounded up to whole seconds, as shown on a countdown.
    pub fn seconds_left(&self) -> u64 {
        self.time_remaining.as_secs_f64().ceil() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    /// Position in the bar after the increment.
    pub beat_index: u8,
    pub downbeat: bool,
    /// Beats since the last reset, starting at 1.
    pub beat_number: u64,
    /// Scheduled time of the beat.
    pub at: Instant,
    /// Countdown after this beat was taken off.
    pub time_remaining: Duration,
}

/// Receives beat and completion notifications from `SessionController::advance`.
pub trait BeatListener {
    fn on_beat(&mut self, event: &BeatEvent);

    fn on_finished(&mut self) {}
}

impl<F: FnMut(&BeatEvent)> BeatListener for F {
    fn on_beat(&mut self, event: &BeatEvent) {
        self(event)
    }
}

/// Owns the beat clock of one practice session.
///
/// Two repeating timers live in the controller's own queue: the beat tick
/// and the display refresh. The beat tick is the only writer of the
/// last-beat timestamp; the refresh only reads it to compute progress.
///
/// Indexing: the beat index starts at 0 and is incremented before the
/// downbeat check, so with four beats per bar the first downbeat is the
/// fourth tick. Each tick takes one beat period off the countdown before
/// listeners and the click are notified.
///
/// Changing the tempo while running does not move the pending tick; the new
/// period applies from the following cycle.
pub struct SessionController {
    bpm: f64,
    beats_per_bar: u8,
    session_duration: Duration,
    frame_interval: Duration,
    sound_enabled: bool,
    click: Box<dyn ClickSink>,
    timers: TimerQueue,
    beat_timer: Option<TimerHandle>,
    frame_timer: Option<TimerHandle>,
    phase: ClockPhase,
    beat_index: u8,
    beat_number: u64,
    /// Period of the beat currently in flight.
    period: Duration,
    last_beat_at: Option<Instant>,
    progress: f64,
    time_remaining: Duration,
}

impl SessionController {
    pub fn new(config: &PracticeConfig, click: Box<dyn ClickSink>) -> Self {
        let config = config.clone().sanitized();
        Self {
            bpm: config.bpm,
            beats_per_bar: config.beats_per_bar,
            session_duration: config.session_duration(),
            frame_interval: config.frame_interval(),
            sound_enabled: config.sound_enabled,
            click,
            timers: TimerQueue::new(),
            beat_timer: None,
            frame_timer: None,
            phase: ClockPhase::Idle,
            beat_index: 0,
            beat_number: 0,
            period: config.beat_period(),
            last_beat_at: None,
            progress: 0.0,
            time_remaining: config.session_duration(),
        }
    }

    /// Starts or resumes the clock. Returns `false` when already running or
    /// finished.
    pub fn start(&mut self, now: Instant) -> bool {
        match self.phase {
            ClockPhase::Running | ClockPhase::Finished => return false,
            ClockPhase::Idle | ClockPhase::Paused => {}
        }
        if self.time_remaining.is_zero() {
            self.finish();
            return false;
        }
        self.period = beat_period(self.bpm);
        self.last_beat_at = Some(now);
        self.progress = 0.0;
        self.beat_timer = Some(self.timers.schedule_repeating(
            now + self.period,
            self.period,
            Missed::Replay,
        ));
        self.frame_timer = Some(self.timers.schedule_repeating(
            now + self.frame_interval,
            self.frame_interval,
            Missed::Skip,
        ));
        self.phase = ClockPhase::Running;
        info!(
            bpm = self.bpm,
            period_ms = self.period.as_millis() as u64,
            remaining_ms = self.time_remaining.as_millis() as u64,
            "session started"
        );
        true
    }

    /// Pauses the clock, keeping beat index and countdown. Safe to call in
    /// any phase and any number of times.
    pub fn stop(&mut self) {
        self.cancel_timers();
        self.progress = 0.0;
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Paused;
            info!(
                beat_index = self.beat_index,
                remaining_ms = self.time_remaining.as_millis() as u64,
                "session paused"
            );
        }
    }

    /// Back to `Idle` with a full countdown.
    pub fn reset(&mut self) {
        self.cancel_timers();
        self.phase = ClockPhase::Idle;
        self.beat_index = 0;
        self.beat_number = 0;
        self.period = beat_period(self.bpm);
        self.last_beat_at = None;
        self.progress = 0.0;
        self.time_remaining = self.session_duration;
        debug!("session reset");
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.phase == ClockPhase::Running {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Fires every timer due at `now`. Overdue beats fire at their own
    /// deadlines, then progress is sampled once. Returns the number of beats.
    pub fn advance<L: BeatListener + ?Sized>(&mut self, now: Instant, listener: &mut L) -> usize {
        let mut beats = 0;
        let mut refresh = false;
        while let Some((handle, at)) = self.timers.pop_due(now) {
            if Some(handle) == self.beat_timer {
                self.beat(at, listener);
                beats += 1;
            } else if Some(handle) == self.frame_timer {
                refresh = true;
            }
        }
        if refresh && self.phase == ClockPhase::Running {
            self.progress = self.progress_at(now);
        }
        beats
    }

    fn beat<L: BeatListener + ?Sized>(&mut self, at: Instant, listener: &mut L) {
        self.beat_index = (self.beat_index + 1) % self.beats_per_bar;
        self.beat_number += 1;
        let downbeat = self.beat_index == 0;
        self.last_beat_at = Some(at);
        self.progress = 0.0;
        self.time_remaining = self.time_remaining.saturating_sub(self.period);
        // a tempo change takes effect from here on
        self.period = beat_period(self.bpm);

        let event = BeatEvent {
            beat_index: self.beat_index,
            downbeat,
            beat_number: self.beat_number,
            at,
            time_remaining: self.time_remaining,
        };
        debug!(
            beat = event.beat_number,
            index = event.beat_index,
            downbeat,
            remaining_ms = self.time_remaining.as_millis() as u64,
            "beat"
        );
        if self.sound_enabled {
            self.click.play_tick(downbeat);
        }
        listener.on_beat(&event);

        if self.time_remaining.is_zero() {
            self.finish();
            listener.on_finished();
        }
    }

    fn finish(&mut self) {
        self.cancel_timers();
        self.progress = 0.0;
        self.phase = ClockPhase::Finished;
        info!(beats = self.beat_number, "session finished");
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.beat_timer.take() {
            self.timers.cancel(handle);
        }
        if let Some(handle) = self.frame_timer.take() {
            self.timers.cancel(handle);
        }
    }

    /// When the event loop should call `advance` next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Progress the display refresh would compute at `now`.
    pub fn progress_at(&self, now: Instant) -> f64 {
        if self.phase != ClockPhase::Running {
            return 0.0;
        }
        let Some(last) = self.last_beat_at else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        (elapsed / self.period.as_secs_f64() * 100.0).clamp(0.0, 100.0)
    }

    /// Last sampled progress in percent.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            beat_index: self.beat_index,
            progress: self.progress,
            time_remaining: self.time_remaining,
            is_running: self.is_running(),
            is_finished: self.is_finished(),
            bpm: self.bpm,
            sound_enabled: self.sound_enabled,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ClockPhase::Finished
    }

    pub fn beat_index(&self) -> u8 {
        self.beat_index
    }

    pub fn beat_number(&self) -> u64 {
        self.beat_number
    }

    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Period of the beat currently in flight.
    pub fn beat_period(&self) -> Duration {
        self.period
    }

    pub fn beats_per_bar(&self) -> u8 {
        self.beats_per_bar
    }

    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Clamped to at least 1 bpm. See the type docs for when it applies.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = clamp_bpm(bpm);
        if let Some(handle) = self.beat_timer {
            self.timers.set_period(handle, beat_period(self.bpm));
        } else {
            self.period = beat_period(self.bpm);
        }
        debug!(bpm = self.bpm, "tempo changed");
    }

    /// Read on every beat, so it can be flipped mid-session.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn set_beats_per_bar(&mut self, beats: u8) {
        self.beats_per_bar = beats.max(1);
        self.beat_index %= self.beats_per_bar;
    }

    /// New countdown length. Applies immediately while idle, otherwise at the
    /// next reset.
    pub fn set_session_duration(&mut self, duration: Duration) {
        self.session_duration = duration;
        if self.phase == ClockPhase::Idle {
            self.time_remaining = duration;
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}
