use tracing::debug;

use crate::dsp::ClickTone;
use crate::stream::ClickFeeder;

/// Something that can sound a metronome tick.
///
/// Ticks must never fail from the caller's point of view; an implementation
/// that loses its output device keeps accepting ticks and drops them.
pub trait ClickSink {
    fn play_tick(&mut self, downbeat: bool);
}

/// Click sink that produces no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClick;

impl ClickSink for NullClick {
    fn play_tick(&mut self, downbeat: bool) {
        debug!(downbeat, "null click");
    }
}

/// Renders clicks into a queue drained by some output callback.
pub struct QueuedClick {
    tone: ClickTone,
    sample_rate: u32,
    feeder: ClickFeeder,
    downbeat: Vec<f32>,
    beat: Vec<f32>,
}

impl QueuedClick {
    /// Both click variants are rendered once up front.
    pub fn new(tone: ClickTone, sample_rate: u32, feeder: ClickFeeder) -> Self {
        Self {
            downbeat: tone.synthesize(sample_rate, true),
            beat: tone.synthesize(sample_rate, false),
            tone,
            sample_rate,
            feeder,
        }
    }

    pub fn tone(&self) -> ClickTone {
        self.tone
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl ClickSink for QueuedClick {
    fn play_tick(&mut self, downbeat: bool) {
        let samples = if downbeat { &self.downbeat } else { &self.beat };
        self.feeder.queue(samples);
    }
}

impl<T: ClickSink + ?Sized> ClickSink for Box<T> {
    fn play_tick(&mut self, downbeat: bool) {
        (**self).play_tick(downbeat);
    }
}
