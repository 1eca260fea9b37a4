use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use fretdrill_domain::{ChordProvider, ChordSelection, DiagramSpec, Shape};

use crate::clock::{BeatEvent, BeatListener, SessionController};
use crate::selector::{ChordSelector, UniformSource};

/// How long the display flashes after a downbeat.
pub const FLASH_DURATION: Duration = Duration::from_millis(150);

/// Shown in place of a diagram when the chord has no fingering data.
pub const NOT_FOUND: &str = "Chord shape not found";

/// What a presentation layer needs to show one chord.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChordCard {
    pub selection: ChordSelection,
    pub title: String,
    pub shape: Option<Shape>,
    pub diagram: Option<DiagramSpec>,
}

impl ChordCard {
    pub fn build<P: ChordProvider + ?Sized>(selection: ChordSelection, provider: &P) -> Self {
        let fingering = provider.resolve(&selection);
        if fingering.is_none() {
            debug!(?selection, "chord has no fingering data");
        }
        Self {
            selection,
            title: selection.title(),
            shape: fingering.map(|f| Shape::classify(&f.frets)),
            diagram: fingering.map(|f| DiagramSpec::for_selection(&selection, f)),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.diagram.is_some()
    }

    pub fn shape_label(&self) -> &'static str {
        self.shape.unwrap_or(Shape::Unknown).label()
    }

    /// Text to show instead of a diagram.
    pub fn fallback(&self) -> Option<&'static str> {
        (!self.is_resolved()).then_some(NOT_FOUND)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ChangeOn {
    #[default]
    EveryBeat,
    Downbeat,
}

/// One random chord at a time, replaced on the beat.
pub struct RandomDrill<P, R> {
    selector: ChordSelector<P, R>,
    current: ChordSelection,
    change_on: ChangeOn,
    changes: u64,
}

impl<P: ChordProvider, R: UniformSource> RandomDrill<P, R> {
    pub fn new(mut selector: ChordSelector<P, R>, change_on: ChangeOn) -> Self {
        let current = selector.pick_random();
        Self {
            selector,
            current,
            change_on,
            changes: 0,
        }
    }

    pub fn current(&self) -> ChordSelection {
        self.current
    }

    pub fn card(&self) -> ChordCard {
        ChordCard::build(self.current, self.selector.provider())
    }

    /// Chord changes since the drill was created.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn change_on(&self) -> ChangeOn {
        self.change_on
    }
}

impl<P: ChordProvider, R: UniformSource> BeatListener for RandomDrill<P, R> {
    fn on_beat(&mut self, event: &BeatEvent) {
        let change = match self.change_on {
            ChangeOn::EveryBeat => true,
            ChangeOn::Downbeat => event.downbeat,
        };
        if change {
            self.current = self.selector.pick_random();
            self.changes += 1;
        }
    }
}

/// How to continue after a switch session completes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FinishChoice {
    RetrySamePair,
    NewPair,
}

/// Two distinct chords; the one to play flips on every downbeat.
pub struct SwitchDrill<P, R> {
    selector: ChordSelector<P, R>,
    pair: [ChordSelection; 2],
    active: usize,
    flash_until: Option<Instant>,
    finished: bool,
}

impl<P: ChordProvider, R: UniformSource> SwitchDrill<P, R> {
    pub fn new(mut selector: ChordSelector<P, R>) -> Self {
        let (first, second) = selector.pick_distinct_pair();
        Self {
            selector,
            pair: [first, second],
            active: 0,
            flash_until: None,
            finished: false,
        }
    }

    pub fn pair(&self) -> [ChordSelection; 2] {
        self.pair
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> ChordSelection {
        self.pair[self.active]
    }

    pub fn cards(&self) -> [ChordCard; 2] {
        let provider = self.selector.provider();
        [
            ChordCard::build(self.pair[0], provider),
            ChordCard::build(self.pair[1], provider),
        ]
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.flash_until.map_or(false, |until| now < until)
    }

    /// Set when the clock reports completion, cleared by `apply`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn new_pair(&mut self) {
        let (first, second) = self.selector.pick_distinct_pair();
        self.pair = [first, second];
        self.restart();
    }

    fn restart(&mut self) {
        self.active = 0;
        self.flash_until = None;
        self.finished = false;
    }

    /// Applies the user's choice and resets the clock for another run.
    pub fn apply(&mut self, choice: FinishChoice, clock: &mut SessionController) {
        match choice {
            FinishChoice::RetrySamePair => self.restart(),
            FinishChoice::NewPair => self.new_pair(),
        }
        clock.reset();
    }
}

impl<P: ChordProvider, R: UniformSource> BeatListener for SwitchDrill<P, R> {
    fn on_beat(&mut self, event: &BeatEvent) {
        if event.downbeat {
            self.active = 1 - self.active;
            self.flash_until = Some(event.at + FLASH_DURATION);
        }
    }

    fn on_finished(&mut self) {
        self.finished = true;
    }
}
