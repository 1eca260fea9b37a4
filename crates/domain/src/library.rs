use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::{ChordQuality, ChordSelection, DomainError, Fingering, Note};

const BUNDLED_GUITAR: &str = include_str!("../data/guitar.json");

/// Read-only source of fingerings keyed by root note and quality.
///
/// A missing entry and an empty list both mean the chord cannot be drawn.
pub trait ChordProvider {
    fn lookup(&self, note: Note, quality: ChordQuality) -> Option<&[Fingering]>;

    fn variant_count(&self, note: Note, quality: ChordQuality) -> usize {
        self.lookup(note, quality).map_or(0, <[Fingering]>::len)
    }

    fn resolve(&self, selection: &ChordSelection) -> Option<&Fingering> {
        self.lookup(selection.note, selection.quality)?
            .get(selection.variant)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChordLibrary {
    entries: HashMap<(Note, ChordQuality), Vec<Fingering>>,
}

#[derive(Deserialize)]
struct RawLibrary {
    chords: BTreeMap<String, Vec<RawQuality>>,
}

#[derive(Deserialize)]
struct RawQuality {
    suffix: String,
    positions: Vec<Fingering>,
}

impl ChordLibrary {
    /// Guitar library compiled into the binary.
    pub fn bundled() -> Result<Self, DomainError> {
        Self::from_json_str(BUNDLED_GUITAR)
    }

    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let raw: RawLibrary = serde_json::from_str(json)?;
        let mut library = Self::default();
        for (key, qualities) in raw.chords {
            let Some(note) = Note::from_key(&key) else {
                debug!(key = %key, "skipping unknown root note");
                continue;
            };
            for quality in qualities {
                match ChordQuality::from_suffix(&quality.suffix) {
                    Some(parsed) => library.insert(note, parsed, quality.positions),
                    None => debug!(suffix = %quality.suffix, "skipping unsupported quality"),
                }
            }
        }
        info!(entries = library.entries.len(), "chord library loaded");
        Ok(library)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn insert(&mut self, note: Note, quality: ChordQuality, fingerings: Vec<Fingering>) {
        self.entries
            .entry((note, quality))
            .or_default()
            .extend(fingerings);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Note and quality pairs with no playable fingering.
    pub fn unresolvable(&self) -> Vec<(Note, ChordQuality)> {
        Note::ALL
            .into_iter()
            .flat_map(|note| ChordQuality::ALL.into_iter().map(move |q| (note, q)))
            .filter(|(note, quality)| self.variant_count(*note, *quality) == 0)
            .collect()
    }
}

impl ChordProvider for ChordLibrary {
    fn lookup(&self, note: Note, quality: ChordQuality) -> Option<&[Fingering]> {
        self.entries.get(&(note, quality)).map(Vec::as_slice)
    }
}
