pub mod chord;
pub mod config;
pub mod diagram;
pub mod error;
pub mod fingering;
pub mod library;
pub mod shape;

pub use crate::chord::{ChordQuality, ChordSelection, Note};
pub use crate::config::{beat_period, clamp_bpm, PracticeConfig, MAX_BPM, MIN_BPM};
pub use crate::diagram::{DiagramSpec, Instrument};
pub use crate::error::DomainError;
pub use crate::fingering::{Barre, Fingering, MUTED};
pub use crate::library::{ChordLibrary, ChordProvider};
pub use crate::shape::{shape_name, Shape};
