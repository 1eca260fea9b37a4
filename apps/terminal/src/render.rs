use fretdrill_domain::DiagramSpec;
use fretdrill_trainer::{ChordCard, ClockPhase, SessionState};

pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

pub fn beat_dots(beat_index: u8, beats_per_bar: u8, flash: bool) -> String {
    (0..beats_per_bar)
        .map(|beat| match (beat == beat_index, flash && beat == 0) {
            (true, true) => "◉",
            (true, false) => "●",
            _ => "○",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn status_line(state: &SessionState, beats_per_bar: u8, flash: bool, playing: &str) -> String {
    let mut line = format!(
        "{} {} {:>4}s {:>4.0} bpm{}  {}",
        progress_bar(state.progress, 24),
        beat_dots(state.beat_index, beats_per_bar, flash),
        state.seconds_left(),
        state.bpm,
        if state.sound_enabled { "" } else { " muted" },
        playing
    );
    if state.phase == ClockPhase::Paused {
        line.push_str("  [paused]");
    }
    line
}

/// Plain-text chord box: tuning, open/muted markers, nut or base fret, then
/// one row per fret with finger numbers and barres drawn as dashes.
pub fn diagram_lines(spec: &DiagramSpec) -> Vec<String> {
    let strings = spec.frets.len();
    let width = strings * 2 - 1;
    let mut lines = Vec::new();
    lines.push(
        spec.instrument
            .tuning
            .iter()
            .take(strings)
            .cloned()
            .collect::<Vec<_>>()
            .join(" "),
    );
    let markers: Vec<String> = spec
        .frets
        .iter()
        .map(|fret| match fret {
            -1 => "x",
            0 => "o",
            _ => " ",
        })
        .map(String::from)
        .collect();
    lines.push(markers.join(" ").trim_end().to_string());
    if spec.base_fret <= 1 {
        lines.push("=".repeat(width));
    } else {
        lines.push(format!("{} {}fr", "-".repeat(width), spec.base_fret));
    }
    for row in 1..=spec.instrument.frets_on_chord {
        let mut line = String::with_capacity(width);
        for string in 0..strings {
            if string > 0 {
                let joined = spec.barres.iter().any(|barre| {
                    barre.fret == row && barre.from_string < string && string <= barre.to_string
                });
                line.push(if joined { '-' } else { ' ' });
            }
            line.push(if spec.frets[string] == row as i8 {
                match spec.fingers.get(string) {
                    Some(finger) if (1..=9).contains(finger) => char::from(b'0' + finger),
                    _ => '*',
                }
            } else {
                '|'
            });
        }
        lines.push(line);
    }
    lines
}

pub fn card_lines(card: &ChordCard, show_diagram: bool, heading: &str) -> Vec<String> {
    let mut lines = vec![format!("{heading}{}  ({})", card.title, card.shape_label())];
    if !show_diagram {
        return lines;
    }
    match (&card.diagram, card.fallback()) {
        (Some(diagram), _) => lines.extend(diagram_lines(diagram).into_iter().map(|l| format!("  {l}"))),
        (None, Some(text)) => lines.push(format!("  {text}")),
        (None, None) => {}
    }
    lines
}
