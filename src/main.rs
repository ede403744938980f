use arcade_chime::audio::export::{ExportSettings, export_wav, render_event_lines};
use arcade_chime::{NoteSequencer, Preset, SequencerConfig};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: arcade_chime [events.jsonl|-] [out.wav] [config.ron|layered|minimal]";
const DEFAULT_OUTPUT: &str = "arcade_chime.wav";

fn main() -> ExitCode {
    arcade_chime::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let input = args.first().map(String::as_str).unwrap_or("-");
    let output = PathBuf::from(args.get(1).map(String::as_str).unwrap_or(DEFAULT_OUTPUT));
    let config = load_config(args.get(2).map(String::as_str))?;

    let lines = read_lines(input)?;
    tracing::info!(input, events = lines.len(), "Replaying game events");

    let settings = ExportSettings::default();
    let sequencer = NoteSequencer::new(config)?;
    let rendered = render_event_lines(sequencer, &lines, &settings)?;

    for diagnostic in &rendered.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    let summary = export_wav(&output, &rendered.samples, &settings)?;
    println!(
        "{} events -> {} notes, {:.2}s written to {}",
        rendered.records,
        rendered.commands,
        summary.duration_seconds,
        summary.path.display()
    );
    Ok(())
}

/// A config file path, a preset name, or the default preset
fn load_config(arg: Option<&str>) -> Result<SequencerConfig, Box<dyn std::error::Error>> {
    match arg {
        None => Ok(SequencerConfig::default()),
        Some(arg) if Path::new(arg).is_file() => Ok(SequencerConfig::load(Path::new(arg))?),
        Some(name) => Ok(name.parse::<Preset>()?.config()),
    }
}

fn read_lines(input: &str) -> io::Result<Vec<String>> {
    if input == "-" {
        io::stdin().lock().lines().collect()
    } else {
        let file = std::fs::File::open(input)?;
        BufReader::new(file).lines().collect()
    }
}
