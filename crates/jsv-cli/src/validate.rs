//! # Validate Subcommand
//!
//! Validates one or more instance files against a schema file. `$ref`s in
//! the schema resolve against a schema directory, by default the schema
//! file's own directory.
//!
//! Text output prints one `OK:` / `FAIL:` line per instance, followed by
//! the instance's violations when `--collect` is given. JSON output prints
//! a single array of per-file reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use jsv_schema::{
    decode_document, DirectoryStore, DocumentFormat, Mode, Outcome, ValidateOptions, Validator,
    Violations,
};

/// Output format for validation results.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per instance, plus one line per violation.
    #[default]
    Text,
    /// A JSON array of `{file, valid, violations}` reports.
    Json,
}

/// Arguments for the `jsv validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Directory `$ref` locators resolve against. Defaults to the schema
    /// file's directory.
    #[arg(long, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// URI prefix stripped from `$ref` locators before lookup. Repeatable.
    #[arg(long, value_name = "URI")]
    pub prefix: Vec<String>,

    /// Report every violation instead of a pass/fail answer.
    #[arg(long)]
    pub collect: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Instance files to validate (JSON or YAML).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Per-file entry of the JSON report.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Violations>,
}

/// Execute the validate subcommand, writing results to stdout.
///
/// Returns exit code: 0 when all instances conform, 1 when any has
/// violations. Operational errors are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, cwd: &Path) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, cwd, &mut out)
}

/// [`run_validate`] with an explicit output sink.
pub fn run_validate_to(args: &ValidateArgs, cwd: &Path, out: &mut impl Write) -> Result<u8> {
    let schema_path = crate::resolve_path(&args.schema, cwd);
    let schema = load_document(&schema_path).context("failed to load schema")?;

    let schema_dir = match &args.schema_dir {
        Some(dir) => crate::resolve_path(dir, cwd),
        None => schema_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf()),
    };
    if !schema_dir.is_dir() {
        bail!("schema directory not found: {}", schema_dir.display());
    }

    let store = args
        .prefix
        .iter()
        .fold(DirectoryStore::new(&schema_dir), |store, prefix| {
            store.with_prefix(prefix.as_str())
        });
    let validator = Validator::new(store);
    tracing::info!(
        schema = %schema_path.display(),
        schema_dir = %schema_dir.display(),
        "loaded schema"
    );

    let mode = if args.collect { Mode::Collect } else { Mode::Boolean };
    let options = ValidateOptions::new().mode(mode);

    let mut reports = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let resolved = crate::resolve_path(path, cwd);
        let instance = load_document(&resolved)?;
        let outcome = validator
            .validate(&schema, &instance, &options)
            .with_context(|| format!("validation of {} aborted", path.display()))?;
        tracing::debug!(file = %path.display(), valid = outcome.is_valid(), "validated");

        let valid = outcome.is_valid();
        let violations = match outcome {
            Outcome::Violations(list) => Some(list),
            Outcome::Valid(_) => None,
        };
        reports.push(FileReport {
            file: path.display().to_string(),
            valid,
            violations,
        });
    }

    match args.format {
        OutputFormat::Text => write_text(&reports, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports)
                .context("failed to write JSON report")?;
            writeln!(out)?;
        }
    }

    Ok(if reports.iter().all(|r| r.valid) { 0 } else { 1 })
}

fn write_text(reports: &[FileReport], out: &mut impl Write) -> Result<()> {
    for report in reports {
        let status = if report.valid { "OK" } else { "FAIL" };
        writeln!(out, "{status}: {}", report.file)?;
        if let Some(violations) = &report.violations {
            for violation in violations {
                writeln!(out, "{violation}")?;
            }
        }
    }
    Ok(())
}

/// Read and decode a JSON or YAML file, choosing the decoder by extension.
fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode_document(&text, DocumentFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}
