use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fretdrill_domain::{ChordLibrary, ChordProvider, ChordQuality, Note, Shape};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Check which chords a database can draw and how they classify"
)]
struct Args {
    /// chords-db style JSON file; the bundled guitar set when omitted
    input: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct EntryReport {
    chord: String,
    variants: usize,
    shapes: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Report {
    entries: Vec<EntryReport>,
    unresolvable: Vec<String>,
}

fn audit(library: &ChordLibrary) -> Report {
    let mut entries = Vec::new();
    for note in Note::ALL {
        for quality in ChordQuality::ALL {
            let fingerings = library.lookup(note, quality).unwrap_or_default();
            entries.push(EntryReport {
                chord: format!("{} {}", note, quality),
                variants: fingerings.len(),
                shapes: fingerings
                    .iter()
                    .map(|f| Shape::classify(&f.frets).label())
                    .collect(),
            });
        }
    }
    let unresolvable = library
        .unresolvable()
        .into_iter()
        .map(|(note, quality)| format!("{} {}", note, quality))
        .collect();
    Report {
        entries,
        unresolvable,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let library = match &args.input {
        Some(path) => ChordLibrary::load(path).with_context(|| format!("load {:?}", path))?,
        None => ChordLibrary::bundled()?,
    };
    info!(entries = library.len(), "loaded chord library");
    let report = audit(&library);
    for missing in &report.unresolvable {
        warn!(chord = %missing, "no fingering data");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for entry in &report.entries {
        println!("{:<12} {:>2}  {}", entry.chord, entry.variants, entry.shapes.join(", "));
    }
    println!(
        "{} of {} chords drawable",
        report.entries.len() - report.unresolvable.len(),
        report.entries.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_library_is_fully_drawable() {
        let report = audit(&ChordLibrary::bundled().unwrap());
        assert_eq!(report.entries.len(), 60);
        assert!(report.unresolvable.is_empty());
        assert!(report.entries.iter().all(|e| e.variants == e.shapes.len()));
    }

    #[test]
    fn empty_library_reports_everything_missing() {
        let report = audit(&ChordLibrary::default());
        assert_eq!(report.unresolvable.len(), 60);
        assert!(report.entries.iter().all(|e| e.variants == 0));
    }
}
