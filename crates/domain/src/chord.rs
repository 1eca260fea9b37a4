use std::fmt;

use serde::{Deserialize, Serialize};

/// Root notes, spelled the way the chord database keys them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    Csharp,
    D,
    Eb,
    E,
    F,
    Fsharp,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl Note {
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Csharp,
        Note::D,
        Note::Eb,
        Note::E,
        Note::F,
        Note::Fsharp,
        Note::G,
        Note::Ab,
        Note::A,
        Note::Bb,
        Note::B,
    ];

    /// Key used by the chord database.
    pub fn key(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Csharp => "Csharp",
            Note::D => "D",
            Note::Eb => "Eb",
            Note::E => "E",
            Note::F => "F",
            Note::Fsharp => "Fsharp",
            Note::G => "G",
            Note::Ab => "Ab",
            Note::A => "A",
            Note::Bb => "Bb",
            Note::B => "B",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|note| note.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Note::Csharp => "C#",
            Note::Fsharp => "F#",
            other => other.key(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Minor7,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 5] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
    ];

    /// Suffix used by the chord database.
    pub fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|quality| quality.suffix() == suffix)
    }

    /// The next quality in `ALL`, wrapping around.
    pub fn cycled(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|quality| *quality == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One concrete fingering: a note, a quality and the index of a variant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChordSelection {
    pub note: Note,
    pub quality: ChordQuality,
    pub variant: usize,
}

impl ChordSelection {
    pub fn new(note: Note, quality: ChordQuality, variant: usize) -> Self {
        Self {
            note,
            quality,
            variant,
        }
    }

    /// Human readable title, e.g. `C# maj7`.
    pub fn title(&self) -> String {
        format!("{} {}", self.note, self.quality)
    }

    /// Compact name handed to diagram renderers, e.g. `C#maj7`.
    pub fn diagram_name(&self) -> String {
        format!("{}{}", self.note, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_keys_round_trip() {
        for note in Note::ALL {
            assert_eq!(Note::from_key(note.key()), Some(note));
        }
        assert_eq!(Note::from_key("C#"), None);
        assert_eq!(Note::Csharp.display_name(), "C#");
        assert_eq!(Note::Eb.display_name(), "Eb");
    }

    #[test]
    fn quality_suffixes() {
        assert_eq!(ChordQuality::from_suffix("maj7"), Some(ChordQuality::Major7));
        assert_eq!(ChordQuality::from_suffix("sus2"), None);
        assert_eq!(ChordQuality::Minor7.cycled(), ChordQuality::Major);
        assert_eq!(ChordQuality::Major.cycled(), ChordQuality::Minor);
    }

    #[test]
    fn selection_titles() {
        let selection = ChordSelection::new(Note::Fsharp, ChordQuality::Minor7, 1);
        assert_eq!(selection.title(), "F# m7");
        assert_eq!(selection.diagram_name(), "F#m7");
    }

    #[test]
    fn selections_compare_by_value() {
        let a = ChordSelection::new(Note::C, ChordQuality::Major, 0);
        let b = ChordSelection::new(Note::C, ChordQuality::Major, 0);
        let c = ChordSelection::new(Note::C, ChordQuality::Major, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
