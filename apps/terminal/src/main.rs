mod controls;
mod render;
mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fretdrill_audio::ClickSink;
use fretdrill_domain::{ChordLibrary, PracticeConfig};
use fretdrill_trainer::{
    BeatListener, ChangeOn, ChordSelector, FinishChoice, RandomDrill, RngSource, SessionController,
    SwitchDrill,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::controls::{Control, ViewOptions};
use crate::settings::Overrides;

type Input = Lines<BufReader<Stdin>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drill guitar chord changes against a metronome", long_about = None)]
struct Cli {
    /// YAML or JSON practice config (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Chord database in chords-db JSON layout (defaults to the bundled guitar set)
    #[arg(long)]
    library: Option<PathBuf>,
    /// Beats per minute
    #[arg(short, long)]
    bpm: Option<f64>,
    /// Session length in seconds
    #[arg(short, long)]
    seconds: Option<u32>,
    /// Beats in one bar
    #[arg(long)]
    beats_per_bar: Option<u8>,
    /// Disable the metronome click
    #[arg(long)]
    mute: bool,
    /// Show chord names only
    #[arg(long)]
    hide_diagrams: bool,
    /// Seed for reproducible chord sequences
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// A new random chord on every beat
    Random {
        /// Only change chords on the first beat of each bar
        #[arg(long)]
        on_downbeat: bool,
    },
    /// Alternate between two chords, switching every bar
    Switch {
        /// Draw a new pair and start again whenever a session ends
        #[arg(long)]
        repeat: bool,
    },
}

enum Outcome {
    Finished,
    Interrupted,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        bpm: cli.bpm,
        seconds: cli.seconds,
        beats_per_bar: cli.beats_per_bar,
        mute: cli.mute,
        hide_diagrams: cli.hide_diagrams,
    };
    let config = overrides.apply(settings::load_config(cli.config.as_deref())?);
    let library = match &cli.library {
        Some(path) => {
            ChordLibrary::load(path).with_context(|| format!("load chord library {:?}", path))?
        }
        None => ChordLibrary::bundled().context("load bundled chord library")?,
    };
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, bpm = config.bpm, seconds = config.session_seconds, "starting drill");

    let selector = ChordSelector::new(library, RngSource::seeded(seed));
    let mut clock = SessionController::new(&config, click_sink(&config));
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut view = ViewOptions {
        show_diagrams: config.show_diagrams,
    };
    print_lines(&[controls::HELP.to_string()]);

    match cli.command {
        Command::Random { on_downbeat } => {
            let change_on = if on_downbeat {
                ChangeOn::Downbeat
            } else {
                ChangeOn::EveryBeat
            };
            let drill = RandomDrill::new(selector, change_on);
            run_random(&mut clock, drill, &mut input, &mut view).await
        }
        Command::Switch { repeat } => {
            let drill = SwitchDrill::new(selector);
            run_switch(&mut clock, drill, &mut input, &mut view, repeat).await
        }
    }
}

#[cfg(feature = "audio-device")]
fn click_sink(config: &PracticeConfig) -> Box<dyn ClickSink> {
    use fretdrill_audio::{ClickTone, DeviceClick};
    Box::new(DeviceClick::new(ClickTone::with_gain(config.click_gain)))
}

#[cfg(not(feature = "audio-device"))]
fn click_sink(config: &PracticeConfig) -> Box<dyn ClickSink> {
    if config.sound_enabled {
        info!("built without audio-device support, clicks are silent");
    }
    Box::new(fretdrill_audio::NullClick)
}

/// Runs one session: sleeps until the clock's next deadline and advances
/// it, applies typed controls, and redraws after either. Ends when the
/// session finishes, on `q`, or on Ctrl-C.
async fn drive<L, F>(
    clock: &mut SessionController,
    listener: &mut L,
    input: &mut Input,
    view: &mut ViewOptions,
    mut redraw: F,
) -> Outcome
where
    L: BeatListener,
    F: FnMut(&SessionController, &L, &ViewOptions, Instant),
{
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut input_open = true;
    clock.start(Instant::now());
    loop {
        if clock.is_finished() {
            return Outcome::Finished;
        }
        // paused clocks have no deadline and only wait for input
        let deadline = clock.next_deadline();
        let wake = tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now));
        tokio::select! {
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                let now = Instant::now();
                clock.advance(now, listener);
                redraw(&*clock, &*listener, &*view, now);
            }
            line = input.next_line(), if input_open => match line {
                Ok(Some(text)) => match Control::parse(&text) {
                    Some(Control::Quit) => {
                        controls::apply(Control::Quit, clock, view, Instant::now());
                        return Outcome::Interrupted;
                    }
                    Some(control) => {
                        let now = Instant::now();
                        controls::apply(control, clock, view, now);
                        redraw(&*clock, &*listener, &*view, now);
                    }
                    None => debug!(input = %text, "unknown control"),
                },
                Ok(None) => input_open = false,
                Err(err) => {
                    warn!(%err, "stdin closed, live controls disabled");
                    input_open = false;
                }
            },
            _ = &mut ctrl_c => {
                clock.stop();
                return Outcome::Interrupted;
            }
        }
    }
}

fn print_lines(lines: &[String]) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\r\x1b[2K");
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}

fn print_status(line: &str) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\r\x1b[2K{line}");
    let _ = out.flush();
}

async fn run_random<R>(
    clock: &mut SessionController,
    mut drill: RandomDrill<ChordLibrary, R>,
    input: &mut Input,
    view: &mut ViewOptions,
) -> Result<()>
where
    R: fretdrill_trainer::UniformSource,
{
    print_lines(&render::card_lines(&drill.card(), view.show_diagrams, ""));
    let mut shown = (drill.current(), view.show_diagrams);
    let beats_per_bar = clock.beats_per_bar();
    let outcome = drive(clock, &mut drill, input, view, |clock, drill, view, _now| {
        let current = (drill.current(), view.show_diagrams);
        if current != shown {
            shown = current;
            print_lines(&render::card_lines(&drill.card(), view.show_diagrams, ""));
        }
        let title = drill.current().title();
        print_status(&render::status_line(&clock.state(), beats_per_bar, false, &title));
    })
    .await;
    finish_message(&outcome, drill.changes());
    Ok(())
}

async fn run_switch<R>(
    clock: &mut SessionController,
    mut drill: SwitchDrill<ChordLibrary, R>,
    input: &mut Input,
    view: &mut ViewOptions,
    repeat: bool,
) -> Result<()>
where
    R: fretdrill_trainer::UniformSource,
{
    let beats_per_bar = clock.beats_per_bar();
    loop {
        print_pair(&drill, view.show_diagrams);
        let mut active = drill.active_index();
        let mut show = view.show_diagrams;
        let outcome = drive(clock, &mut drill, input, view, |clock, drill, view, now| {
            if view.show_diagrams != show {
                show = view.show_diagrams;
                print_pair(drill, show);
            }
            if drill.active_index() != active {
                active = drill.active_index();
                print_lines(&[format!("switch to {}", drill.active().title())]);
            }
            let title = format!("PLAYING {}", drill.active().title());
            print_status(&render::status_line(
                &clock.state(),
                beats_per_bar,
                drill.is_flashing(now),
                &title,
            ));
        })
        .await;
        if let Outcome::Interrupted = outcome {
            finish_message(&outcome, clock.beat_number());
            return Ok(());
        }
        print_lines(&["Session complete! How did those switches feel?".to_string()]);
        let choice = if repeat {
            FinishChoice::NewPair
        } else {
            print_status("[r]etry same pair, [n]ew pair, [q]uit: ");
            match input.next_line().await? {
                Some(answer) if answer.trim() == "r" => FinishChoice::RetrySamePair,
                Some(answer) if answer.trim() == "n" => FinishChoice::NewPair,
                _ => return Ok(()),
            }
        };
        drill.apply(choice, clock);
    }
}

fn print_pair<P, R>(drill: &SwitchDrill<P, R>, show: bool)
where
    P: fretdrill_domain::ChordProvider,
    R: fretdrill_trainer::UniformSource,
{
    let [first, second] = drill.cards();
    let mut lines = render::card_lines(&first, show, "1: ");
    lines.extend(render::card_lines(&second, show, "2: "));
    print_lines(&lines);
}

fn finish_message(outcome: &Outcome, count: u64) {
    match outcome {
        Outcome::Finished => print_lines(&[format!("done ({count})")]),
        Outcome::Interrupted => print_lines(&[format!("stopped ({count})")]),
    }
}
