// crates/errand-validation-cli/src/main.rs
// ============================================================================
// Module: Errand Validation CLI Entry Point
// Description: Command dispatcher for offline errand payload validation.
// Purpose: Validate errand payload files against configured gateways.
// Dependencies: clap, errand-validation-config, errand-validation-core, serde
// ============================================================================

//! ## Overview
//! `errand-validate` loads `errand-validation.toml`, builds the validator
//! set, and validates one errand payload file within a namespace and
//! municipality scope. The violation report is written to stdout as JSON.
//! Exit codes: `0` valid, `2` invalid, `1` when validation could not run.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use errand_validation_config::ErrandValidationConfig;
use errand_validation_core::AmbientRequest;
use errand_validation_core::ErrandDraft;
use errand_validation_core::ErrandSubmission;
use errand_validation_core::RequestAttributes;
use errand_validation_core::ValidationMode;
use errand_validation_core::Violation;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an errand payload file.
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
/// Exit code reported when the payload has violations.
const EXIT_INVALID: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "errand-validate", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an errand payload file.
    Validate(ValidateCommand),
    /// Load and validate the configuration only.
    CheckConfig(CheckConfigCommand),
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Config file path (defaults to `ERRAND_VALIDATION_CONFIG` or
    /// `errand-validation.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Namespace the errand belongs to.
    #[arg(long, value_name = "NS")]
    namespace: String,
    /// Municipality the errand belongs to.
    #[arg(long = "municipality-id", value_name = "MID")]
    municipality_id: String,
    /// Operation the payload is submitted for.
    #[arg(long, value_enum, default_value_t = ModeArg::Create)]
    mode: ModeArg,
    /// Errand payload JSON file.
    #[arg(value_name = "PAYLOAD")]
    payload: PathBuf,
}

/// Arguments for the `check-config` command.
#[derive(Args, Debug)]
struct CheckConfigCommand {
    /// Config file path (defaults to `ERRAND_VALIDATION_CONFIG` or
    /// `errand-validation.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Validation mode argument.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    /// Payload is submitted for creation.
    Create,
    /// Payload is submitted as an update.
    Update,
}

impl From<ModeArg> for ValidationMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Create => Self::Create,
            ModeArg::Update => Self::Update,
        }
    }
}

/// JSON report written by the `validate` command.
#[derive(Debug, Serialize)]
struct ValidationReportOutput<'a> {
    /// True when no violations were reported.
    valid: bool,
    /// Reported violations in order.
    violations: &'a [Violation],
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a single-line message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors returned by bounded file reads.
#[derive(Debug, Error)]
enum ReadLimitError {
    /// File I/O failure.
    #[error("{0}")]
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    #[error("file size {size} exceeds limit {limit}")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Validate(command) => command_validate(&command),
        Commands::CheckConfig(command) => command_check_config(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `validate` command.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let validators = config
        .build_validators()
        .map_err(|err| CliError::new(format!("failed to build validators: {err}")))?;
    let draft = read_payload(&command.payload)?;
    let attributes =
        RequestAttributes::with_path_variables(&command.namespace, &command.municipality_id);
    let scope = AmbientRequest::new(&attributes);
    let submission = ErrandSubmission {
        mode: command.mode.into(),
        draft: &draft,
    };
    let violations = validators
        .validate(&submission, &scope)
        .map_err(|err| CliError::new(format!("validation failed ({}): {err}", err.status())))?;
    let output = ValidationReportOutput {
        valid: violations.is_empty(),
        violations: &violations,
    };
    let rendered = serde_json::to_string(&output)
        .map_err(|err| CliError::new(format!("failed to render report: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if output.valid { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::from(EXIT_INVALID)) }
}

/// Executes the `check-config` command.
fn command_check_config(command: &CheckConfigCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Loads and validates the configuration.
fn load_config(path: Option<&Path>) -> CliResult<ErrandValidationConfig> {
    ErrandValidationConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Reads and parses the errand payload file.
fn read_payload(path: &Path) -> CliResult<ErrandDraft> {
    let bytes = read_bytes_with_limit(path, MAX_PAYLOAD_BYTES).map_err(|err| {
        CliError::new(format!("failed to read payload {}: {err}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("payload {} is not a valid errand: {err}", path.display()))
    })
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
