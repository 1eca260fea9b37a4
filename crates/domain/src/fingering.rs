use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Fret value marking a string that is not played.
pub const MUTED: i8 = -1;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Barre {
    /// Fret relative to the fingering's base fret.
    pub fret: u8,
    /// Lowest string index covered by the barre.
    pub from_string: usize,
    /// Highest string index covered by the barre.
    pub to_string: usize,
}

/// One way to play a chord. Fret offsets are relative to `base_fret`, string
/// index 0 is the lowest-pitched string.
///
/// A `capo` flag in chord data is ignored: diagrams mark a capo from
/// `plays_above_nut` alone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawFingering")]
pub struct Fingering {
    pub frets: Vec<i8>,
    pub fingers: Vec<u8>,
    pub barres: Vec<Barre>,
    pub base_fret: u8,
}

impl Fingering {
    pub fn new(
        frets: Vec<i8>,
        fingers: Vec<u8>,
        barre_frets: &[u8],
        base_fret: u8,
    ) -> Result<Self, DomainError> {
        if frets.len() != fingers.len() {
            return Err(DomainError::validation(format!(
                "fingering has {} frets but {} fingers",
                frets.len(),
                fingers.len()
            )));
        }
        if frets.is_empty() {
            return Err(DomainError::validation("fingering has no strings"));
        }
        if base_fret == 0 {
            return Err(DomainError::validation("base fret starts at 1"));
        }
        if frets.iter().any(|fret| *fret < MUTED) {
            return Err(DomainError::validation("fret offsets cannot be below -1"));
        }
        let barres = barre_frets
            .iter()
            .map(|fret| barre_span(&frets, *fret))
            .collect();
        Ok(Self {
            frets,
            fingers,
            barres,
            base_fret,
        })
    }

    /// Diagrams draw a capo marker whenever the shape sits above the nut.
    pub fn plays_above_nut(&self) -> bool {
        self.base_fret > 1
    }
}

/// Chord databases list barres by fret only; the covered strings are the
/// span of strings fretted at that fret, or every string when none is.
fn barre_span(frets: &[i8], fret: u8) -> Barre {
    let target = i8::try_from(fret).ok();
    let fretted: Vec<usize> = frets
        .iter()
        .enumerate()
        .filter(|(_, value)| Some(**value) == target)
        .map(|(index, _)| index)
        .collect();
    Barre {
        fret,
        from_string: fretted.first().copied().unwrap_or(0),
        to_string: fretted
            .last()
            .copied()
            .unwrap_or(frets.len().saturating_sub(1)),
    }
}

#[derive(Deserialize)]
struct RawFingering {
    frets: Vec<i8>,
    fingers: Vec<u8>,
    #[serde(default)]
    barres: BarreField,
    #[serde(rename = "baseFret", default = "default_base_fret")]
    base_fret: u8,
}

/// `barres` is either a single fret or a list of frets in the database.
#[derive(Deserialize, Default)]
#[serde(untagged)]
enum BarreField {
    #[default]
    None,
    One(u8),
    Many(Vec<u8>),
}

fn default_base_fret() -> u8 {
    1
}

impl TryFrom<RawFingering> for Fingering {
    type Error = DomainError;

    fn try_from(raw: RawFingering) -> Result<Self, Self::Error> {
        let barre_frets = match raw.barres {
            BarreField::None => Vec::new(),
            BarreField::One(fret) => vec![fret],
            BarreField::Many(frets) => frets,
        };
        Fingering::new(raw.frets, raw.fingers, &barre_frets, raw.base_fret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barre_span_covers_fretted_strings() {
        let fingering =
            Fingering::new(vec![-1, 1, 3, 3, 3, 1], vec![0, 1, 2, 3, 4, 1], &[1], 3).unwrap();
        assert_eq!(
            fingering.barres,
            vec![Barre {
                fret: 1,
                from_string: 1,
                to_string: 5
            }]
        );
        assert!(fingering.plays_above_nut());
        assert_eq!(fingering.frets[0], MUTED);
    }

    #[test]
    fn high_barre_frets_do_not_wrap_onto_muted_strings() {
        let fingering =
            Fingering::new(vec![-1, -1, 0, 2, 3, 2], vec![0, 0, 0, 1, 3, 2], &[255], 1).unwrap();
        assert_eq!(
            fingering.barres,
            vec![Barre {
                fret: 255,
                from_string: 0,
                to_string: 5
            }]
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(Fingering::new(vec![0, 2, 2], vec![0, 1], &[], 1).is_err());
        assert!(Fingering::new(vec![], vec![], &[], 1).is_err());
        assert!(Fingering::new(vec![0, 2], vec![0, 1], &[], 0).is_err());
        assert!(Fingering::new(vec![-2, 2], vec![0, 1], &[], 1).is_err());
    }

    #[test]
    fn deserializes_database_layout() {
        let single: Fingering = serde_json::from_str(
            r#"{"frets":[1,3,3,2,1,1],"fingers":[1,3,4,2,1,1],"baseFret":5,"barres":1,"capo":true}"#,
        )
        .unwrap();
        assert_eq!(single.barres.len(), 1);
        assert_eq!(single.barres[0].fret, 1);
        assert!(single.plays_above_nut());

        let open: Fingering =
            serde_json::from_str(r#"{"frets":[0,2,2,1,0,0],"fingers":[0,2,3,1,0,0]}"#).unwrap();
        assert_eq!(open.base_fret, 1);
        assert!(open.barres.is_empty());
        assert!(!open.plays_above_nut());
    }

    #[test]
    fn invalid_database_entry_is_an_error() {
        let result: Result<Fingering, _> =
            serde_json::from_str(r#"{"frets":[0,2,2],"fingers":[0,2],"baseFret":1}"#);
        assert!(result.is_err());
    }
}
