mod error;
mod export;
mod intervals;
mod report;
mod scanner;
mod types;

use clap::{Parser, Subcommand};
use colored::Colorize;
use error::{ReportError, Result};
use intervals::IntervalOutcome;
use log::debug;
use std::error::Error as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use types::REPORT_FILE_NAME;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a report as time intervals between consecutive .pxm captures
    Intervals {
        /// Report to rewrite in place
        #[arg(default_value = REPORT_FILE_NAME)]
        file: PathBuf,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum RunOutcome {
    NoFiles,
    Done { rows: usize, report_path: PathBuf },
}

const TROUBLESHOOTING: [&str; 4] = [
    "Check that you can read the directory and create files in it (permissions).",
    "Close any program that has the report file open (file locks).",
    "Make sure the directory path is valid and not too long.",
    "Make sure the OS and filesystem are supported and report file timestamps.",
];

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let result = match args.command {
        Some(Command::Intervals { file }) => run_intervals(&file),
        None => scanner::resolve_working_dir().and_then(|dir| {
            match run_report(&dir)? {
                RunOutcome::NoFiles => {}
                RunOutcome::Done { rows, report_path } => {
                    println!(
                        "\n{} {} rows written to {}",
                        "=== Report Complete ===".cyan(),
                        rows.to_string().green(),
                        report_path.display()
                    );
                }
            }
            Ok(())
        }),
    };

    ExitCode::from(exit_status(&result, &mut io::stderr().lock()))
}

/// 0 on success (including an empty directory), 1 after reporting the failure to `out`.
fn exit_status(result: &Result<()>, out: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            // Nowhere left to report a broken stderr.
            let _ = print_failure(out, err);
            1
        }
    }
}

/// Scan `dir`, show the creation times and export them next to the scanned files.
fn run_report(dir: &Path) -> Result<RunOutcome> {
    println!(
        "{}",
        format!("=== File Creation Time Report: {} ===", dir.display()).cyan()
    );
    println!("Scanning files...");
    debug!("state: scanning {}", dir.display());

    let files = scanner::list_files(dir)?;
    if files.is_empty() {
        debug!("state: no files");
        println!(
            "{} No files found in {}",
            "WARNING:".yellow(),
            dir.display()
        );
        return Ok(RunOutcome::NoFiles);
    }

    debug!("state: processing {} files", files.len());
    let entries = report::build_report(&files);

    debug!("state: displaying");
    report::print_report_table(&entries);

    let report_path = dir.join(REPORT_FILE_NAME);
    debug!("state: exporting to {}", report_path.display());
    export::export_report(&entries, &report_path)?;

    Ok(RunOutcome::Done {
        rows: entries.len(),
        report_path,
    })
}

fn run_intervals(file: &Path) -> Result<()> {
    match intervals::process_intervals(file)? {
        IntervalOutcome::Cleared => {
            println!("No .pxm entries found in {}.", file.display());
            println!("{} '{}' has been cleared.", "INFO:".green(), file.display());
        }
        IntervalOutcome::Written(rows) => {
            println!(
                "{} '{}' processed and saved ({} rows).",
                "DONE:".green(),
                file.display(),
                rows
            );
        }
    }
    Ok(())
}

fn print_failure(out: &mut impl Write, err: &ReportError) -> io::Result<()> {
    writeln!(out, "\n{} {}", "ERROR:".red(), err)?;

    writeln!(out, "Details: {err:?}")?;
    let mut source = err.source();
    while let Some(cause) = source {
        writeln!(out, "  caused by: {cause}")?;
        source = cause.source();
    }

    writeln!(out, "\n{}", "Troubleshooting:".yellow())?;
    for tip in TROUBLESHOOTING {
        writeln!(out, "  - {tip}")?;
    }

    writeln!(out, "\n{}", "=== Report Failed ===".red())
}
