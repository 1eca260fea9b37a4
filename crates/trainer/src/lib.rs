pub mod clock;
pub mod drill;
pub mod selector;
pub mod timer;

pub use clock::{BeatEvent, BeatListener, ClockPhase, SessionController, SessionState};
pub use drill::{ChangeOn, ChordCard, FinishChoice, RandomDrill, SwitchDrill, NOT_FOUND};
pub use selector::{ChordSelector, RngSource, UniformSource, MAX_PAIR_RETRIES};
pub use timer::{Missed, TimerHandle, TimerQueue};
