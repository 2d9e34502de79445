mod clean;
mod collection;
mod combine;
mod component;
mod entry;
mod error;
mod parser;
mod runtime;
mod serialiser;
mod srt;

use crate::collection::{Collection, IndexedAction};
use crate::component::Timed;
use crate::entry::{Entry, EntryAction};
use crate::srt::Subtitle;

use std::io::{self, Read};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use regex::Regex;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(about = "Review and touch up SRT subtitles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Input {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        long,
        value_name = "FILE",
        help = "A reference copy of the subtitles. Edits are shown and reverted against it."
    )]
    original: Option<String>,
}

#[derive(Args)]
struct Output {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Print subtitles")]
    Show {
        #[command(flatten)]
        input: Input,
        #[arg(
            long,
            value_name = "N",
            conflicts_with = "matching",
            help = "Only print the subtitle at this index."
        )]
        index: Option<usize>,
        #[arg(
            short,
            long,
            value_name = "REGEX",
            help = "Only print subtitles with a line matching this pattern."
        )]
        matching: Option<String>,
    },
    #[command(about = "Find the subtitle playing at, or next after, a point in time")]
    At {
        #[command(flatten)]
        input: Input,
        #[arg(value_name = "TIME", value_parser = parser::parse_timestamp, help = "Playback position as HH:MM:SS,mmm.")]
        time: Duration,
    },
    #[command(about = "Edit one subtitle and write the result as SRT")]
    Edit {
        #[command(flatten)]
        input: Input,
        #[command(flatten)]
        output: Output,
        #[arg(long, value_name = "N", help = "Index of the subtitle to edit.")]
        index: usize,
        #[command(flatten)]
        change: Change,
    },
    #[command(about = "Remove sound cues, markup and speaker labels, keeping only dialogue")]
    Clean {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[command(flatten)]
        output: Output,
    },
    #[command(about = "Combine foreign and native subtitles into one bilingual file")]
    Combine {
        #[arg(value_name = "FOREIGN", help = "Subtitles in the language being studied.")]
        foreign: String,
        #[arg(value_name = "NATIVE", help = "Subtitles in the language you already know.")]
        native: String,
        #[command(flatten)]
        output: Output,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Change {
    #[arg(long, value_name = "LINE", num_args = 1.., help = "Replace the text with these lines.")]
    text: Option<Vec<String>>,
    #[arg(
        long,
        value_name = "MILLIS",
        allow_hyphen_values = true,
        help = "Move the subtitle by this many milliseconds."
    )]
    shift: Option<i64>,
    #[arg(
        long,
        value_names = ["START", "END"],
        num_args = 2,
        value_parser = parser::parse_timestamp,
        help = "Set new show and hide times as HH:MM:SS,mmm."
    )]
    retime: Option<Vec<Duration>>,
    #[arg(long, help = "Undo all edits to the subtitle.")]
    revert: bool,
}

impl Change {
    fn into_action(self) -> EntryAction {
        if let Some(text) = self.text {
            EntryAction::SetText(text)
        } else if let Some(millis) = self.shift {
            EntryAction::Shift(millis)
        } else if let Some(times) = self.retime {
            EntryAction::Retime {
                show_at: times[0],
                hide_at: times[1],
            }
        } else {
            EntryAction::Revert
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show {
            input,
            index,
            matching,
        } => {
            let subs = load(&input)?;
            let pattern = matching
                .map(|p| Regex::new(&p).context("Invalid regex."))
                .transpose()?;
            cmd_show(&subs, index, pattern.as_ref())
        }
        Command::At { input, time } => {
            let subs = load(&input)?;
            println!("{}", describe_at(&subs, time));
            Ok(())
        }
        Command::Edit {
            input,
            output,
            index,
            change,
        } => {
            let subs = load(&input)?;
            let subs = cmd_edit(subs, index, change.into_action())?;
            write_output(&output, subs.iter().map(Entry::subtitle))
        }
        Command::Clean { input, output } => {
            let subs = read_subs(&input)?;
            let subs = clean::Cleaner::new()?.clean(subs);
            write_output(&output, &subs)
        }
        Command::Combine {
            foreign,
            native,
            output,
        } => {
            let cleaner = clean::Cleaner::new()?;
            let foreign = cleaner.clean(read_subs(&foreign)?);
            let native = cleaner.clean(read_subs(&native)?);
            write_output(&output, &combine::combine(&foreign, &native))
        }
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).context(format!("Failed to open input file: '{}'", path))
    }
}

fn parse_subs(data: &str, path: &str) -> Result<Vec<Subtitle>> {
    let subs = parser::parse(data).context(format!("Failed to parse SRT file: '{}'", path))?;
    if subs.is_empty() {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }
    Ok(subs)
}

fn read_subs(path: &str) -> Result<Vec<Subtitle>> {
    parse_subs(&read_input(path)?, path)
}

fn load(input: &Input) -> Result<Collection<Entry>> {
    let current = read_subs(&input.input)?;
    let original = input.original.as_deref().map(read_subs).transpose()?;
    entries(current, original)
}

/// Pairs each subtitle with its reference copy by position.
fn entries(current: Vec<Subtitle>, original: Option<Vec<Subtitle>>) -> Result<Collection<Entry>> {
    let entries: Vec<Entry> = match original {
        None => current.into_iter().map(Entry::new).collect(),
        Some(original) => {
            if original.len() != current.len() {
                return Err(anyhow!(
                    "The reference copy has {} subtitles but the input has {}",
                    original.len(),
                    current.len()
                ));
            }
            current
                .into_iter()
                .zip(original)
                .map(|(cur, orig)| Entry::with_original(cur, orig))
                .collect()
        }
    };
    Ok(entries.into())
}

fn write_output<'a, I>(output: &Output, subs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Subtitle>,
{
    if output.output == "-" {
        serialiser::serialise(subs, io::stdout())
    } else {
        let dst = std::fs::File::create(&output.output)
            .context(format!("Failed to create output file: '{}'", output.output))?;
        serialiser::serialise(subs, dst)
    }
}

fn cmd_show(subs: &Collection<Entry>, index: Option<usize>, pattern: Option<&Regex>) -> Result<()> {
    if let Some(index) = index {
        let view = subs
            .view_at(index)
            .ok_or_else(|| anyhow!("No entry at index {}", index))?;
        println!("#{} {}", index, view);
        return Ok(());
    }

    for index in 0..subs.len() {
        if let Some(view) = subs.view_at(index) {
            if pattern.map_or(true, |re| view.lines.iter().any(|l| re.is_match(l))) {
                println!("#{} {}", index, view);
            }
        }
    }
    Ok(())
}

fn describe_at(subs: &Collection<Entry>, time: Duration) -> String {
    let index = subs.time_to_index(time);
    match (subs.get(index), subs.view_at(index)) {
        (Some(entry), Some(view)) if entry.begin() > time => format!("#{} (up next) {}", index, view),
        (_, Some(view)) => format!("#{} {}", index, view),
        _ => format!("#{} (past the last subtitle)", index),
    }
}

fn cmd_edit(subs: Collection<Entry>, index: usize, action: EntryAction) -> Result<Collection<Entry>> {
    if subs.get(index).is_none() {
        return Err(anyhow!(
            "No entry at index {}, the file has {} subtitles",
            index,
            subs.len()
        ));
    }
    let (subs, seeks) = runtime::run(subs, vec![IndexedAction::new(index, action)]);
    if let Some(pos) = seeks.last() {
        log::info!("Player would seek to {}", serialiser::format_ts(*pos));
    }
    Ok(subs)
}
