//! Filter command handler

use anyhow::{bail, Context, Result};
use humansize::{format_size, DECIMAL};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use logsift::cli::FilterArgs;
use logsift::clipboard;
use logsift::filter::NOTHING_MEANINGFUL;
use logsift::{Config, FilterStats, LogFilter};

/// Saved output name when the input came from stdin.
const STDIN_SAVE_NAME: &str = "filtered_logs.txt";

/// Stats as printed by `--stats-json`.
#[derive(Serialize)]
struct StatsReport<'a> {
    #[serde(flatten)]
    stats: &'a FilterStats,
    input_bytes: usize,
    output_bytes: usize,
}

/// Run the filter over a file or stdin.
///
/// Returns a failure exit code, without an error, when nothing survives.
pub fn handle(args: &FilterArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    let mut config = Config::resolve(config_path)?;
    args.apply(&mut config);

    let input = args.input().map(PathBuf::as_path);
    let content = read_input(input)?;
    let report = LogFilter::new(config.filter)
        .with_threshold(config.grouping.similarity_threshold)
        .run(&content);

    let output = report.outcome.text();
    if args.stats || args.stats_json {
        let stats = StatsReport {
            stats: &report.stats,
            input_bytes: content.len(),
            output_bytes: output.map_or(0, str::len),
        };
        print_stats(&stats, args.stats_json)?;
    }

    let Some(output) = output else {
        eprintln!("{NOTHING_MEANINGFUL}");
        return Ok(ExitCode::FAILURE);
    };

    match destination(args, input) {
        Some(path) => {
            fs::write(&path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved filtered logs to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{output}")?;
        }
    }

    if args.copy {
        let result = clipboard::copy_text(output)?;
        eprintln!("{}", result.message());
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the whole input. Invalid UTF-8 is replaced rather than rejected.
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                bail!("No input: pass a log file or pipe logs on stdin");
            }
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn destination(args: &FilterArgs, input: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = &args.output {
        return Some(path.clone());
    }
    args.save.then(|| PathBuf::from(save_name(input)))
}

/// `filtered_<input file name>`, or `filtered_logs.txt` for stdin.
fn save_name(input: Option<&Path>) -> String {
    input
        .and_then(Path::file_name)
        .map(|name| format!("filtered_{}", name.to_string_lossy()))
        .unwrap_or_else(|| STDIN_SAVE_NAME.to_string())
}

fn print_stats(report: &StatsReport<'_>, json: bool) -> Result<()> {
    let mut stderr = io::stderr().lock();
    if json {
        writeln!(stderr, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }

    let stats = report.stats;
    writeln!(stderr, "Original lines:  {}", stats.original_lines)?;
    writeln!(stderr, "Filtered lines:  {}", stats.filtered_lines)?;
    writeln!(stderr, "Reduction:       {:.1}%", stats.reduction_percent)?;
    writeln!(stderr, "Processing time: {:.1} ms", stats.processing_ms)?;
    writeln!(
        stderr,
        "Input size:      {}",
        format_size(report.input_bytes, DECIMAL)
    )?;
    writeln!(
        stderr,
        "Output size:     {}",
        format_size(report.output_bytes, DECIMAL)
    )?;
    Ok(())
}
