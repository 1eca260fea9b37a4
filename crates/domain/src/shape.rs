use serde::{Deserialize, Serialize};

use crate::fingering::MUTED;

/// CAGED shape a fingering resembles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Shape {
    C,
    A,
    G,
    E,
    D,
    Unknown,
}

impl Shape {
    /// Classifies by the lowest played string. This is a heuristic over the
    /// fret offsets, not a lookup; string index 0 is the lowest-pitched one.
    pub fn classify(frets: &[i8]) -> Self {
        let played = |string: usize| frets.get(string).copied().filter(|fret| *fret != MUTED);
        match frets.iter().position(|fret| *fret != MUTED) {
            Some(0) => match played(1) {
                Some(next) if next >= frets[0] => Shape::E,
                _ => Shape::G,
            },
            Some(1) => {
                if frets.get(2) == frets.get(3) {
                    Shape::A
                } else {
                    Shape::C
                }
            }
            Some(2) => Shape::D,
            _ => Shape::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shape::C => "C shape",
            Shape::A => "A shape",
            Shape::G => "G shape",
            Shape::E => "E shape",
            Shape::D => "D shape",
            Shape::Unknown => "Unknown shape",
        }
    }
}

pub fn shape_name(frets: &[i8]) -> &'static str {
    Shape::classify(frets).label()
}
