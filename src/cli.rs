//! Command-line interface for cguard.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analysis::{Analyzer, AnalyzerConfig};
use crate::diagnostics::{AnalysisResult, Diagnostic};

/// Exit codes.
pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_DIAGNOSTICS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static checker for a teaching subset of C.
///
/// Reports lexical, syntactic and semantic problems in one pass, each with a
/// line/column position and, where one is known, a hint on how to fix it.
#[derive(Parser, Debug)]
#[command(name = "cguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// C source files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Do not print remediation hints
    #[arg(long)]
    pub no_suggestions: bool,

    /// Loop iterations allowed before the parser gives up on a file
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Log analysis progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print only the summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Per-file entry of the JSON report.
#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<FileReport<'a>>,
    total: usize,
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "cguard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Check every file and print the report. Returns the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let mut config = AnalyzerConfig {
        suggestions: !cli.no_suggestions,
        ..AnalyzerConfig::default()
    };
    if let Some(max_iterations) = cli.max_iterations {
        anyhow::ensure!(max_iterations > 0, "--max-iterations must be at least 1");
        config.max_iterations = max_iterations;
    }
    let analyzer = Analyzer::new(config);

    let results: Vec<(PathBuf, AnalysisResult)> = cli
        .files
        .iter()
        .map(|path| {
            info!(path = %path.display(), "checking");
            (path.clone(), analyzer.analyze_file(path))
        })
        .collect();
    let total: usize = results.iter().map(|(_, result)| result.total).sum();

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    match cli.format {
        Format::Json => write_json(&mut out, &results, total)?,
        Format::Pretty => {
            if !cli.quiet {
                for (path, result) in &results {
                    write_pretty(&mut out, &path.display().to_string(), result, color)?;
                }
            }
            write_summary(&mut out, results.len(), total, color)?;
        }
    }
    out.flush()?;

    Ok(if total == 0 { EXIT_CLEAN } else { EXIT_DIAGNOSTICS })
}

fn write_json(
    out: &mut impl Write,
    results: &[(PathBuf, AnalysisResult)],
    total: usize,
) -> anyhow::Result<()> {
    let report = JsonReport {
        files: results
            .iter()
            .map(|(path, result)| FileReport {
                path: path.display().to_string(),
                result,
            })
            .collect(),
        total,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// `path:line:col: <lexical|error>: message`, then an indented hint.
pub fn write_pretty(
    out: &mut impl Write,
    path: &str,
    result: &AnalysisResult,
    color: bool,
) -> io::Result<()> {
    for diag in &result.lexical {
        write_diagnostic(out, path, "lexical", diag, color)?;
    }
    for diag in &result.semantic {
        write_diagnostic(out, path, "error", diag, color)?;
    }
    Ok(())
}

fn write_diagnostic(
    out: &mut impl Write,
    path: &str,
    kind: &str,
    diag: &Diagnostic,
    color: bool,
) -> io::Result<()> {
    let position = format!("{}:{}:{}:", path, diag.line, diag.column);
    if color {
        let label = if kind == "lexical" {
            format!("{}:", kind).yellow().bold()
        } else {
            format!("{}:", kind).red().bold()
        };
        writeln!(
            out,
            "{} {} {}",
            position.bold(),
            label,
            diag.message
        )?;
    } else {
        writeln!(out, "{} {}: {}", position, kind, diag.message)?;
    }

    if let Some(hint) = &diag.suggestion {
        if color {
            writeln!(out, "    {} {}", "hint:".cyan(), hint)?;
        } else {
            writeln!(out, "    hint: {}", hint)?;
        }
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, files: usize, total: usize, color: bool) -> io::Result<()> {
    let line = format!("{} problem(s) in {} file(s)", total, files);
    if !color {
        return writeln!(out, "{}", line);
    }
    if total == 0 {
        writeln!(out, "{}", line.green())
    } else {
        writeln!(out, "{}", line.red().bold())
    }
}
