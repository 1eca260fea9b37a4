use serde::{Deserialize, Serialize};

use crate::{Barre, ChordSelection, Fingering};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    pub strings: usize,
    pub frets_on_chord: u8,
    /// Open string names, lowest first.
    pub tuning: Vec<String>,
}

impl Instrument {
    pub fn guitar() -> Self {
        Self {
            name: "Guitar".into(),
            strings: 6,
            frets_on_chord: 4,
            tuning: ["E", "A", "D", "G", "B", "E"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::guitar()
    }
}

/// Everything a chord diagram renderer needs, copied from a fingering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagramSpec {
    pub name: String,
    pub frets: Vec<i8>,
    pub fingers: Vec<u8>,
    /// Barre frets with the strings each one covers.
    pub barres: Vec<Barre>,
    pub base_fret: u8,
    /// Drawn whenever the shape sits above the nut.
    pub capo: bool,
    pub instrument: Instrument,
}

impl DiagramSpec {
    pub fn new(name: impl Into<String>, fingering: &Fingering, instrument: Instrument) -> Self {
        Self {
            name: name.into(),
            frets: fingering.frets.clone(),
            fingers: fingering.fingers.clone(),
            barres: fingering.barres.clone(),
            base_fret: fingering.base_fret,
            capo: fingering.plays_above_nut(),
            instrument,
        }
    }

    pub fn for_selection(selection: &ChordSelection, fingering: &Fingering) -> Self {
        Self::new(selection.diagram_name(), fingering, Instrument::guitar())
    }
}
