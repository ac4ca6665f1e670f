//! Binary entry point for the pycomments CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Print the comment-enriched tree as JSON
//! pycomments parse src/app.py --mode attached
//!
//! # Regenerate source from the tree, comments included
//! pycomments unparse src/app.py
//!
//! # Verify the parse/unparse round trip for a whole tree
//! pycomments check src/ tests/
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use pycomments::check::check_file;
use pycomments::error::{OutputErrorCode, PyCommentsError};
use pycomments::files::{collect_python_files, read_source};
use pycomments::output::{
    emit_response, CheckResponse, ErrorResponse, ParseResponse, UnparseResponse,
};
use pycomments::{
    count_comments, parse_with_config, strip_comments, unparse_with_options, CommentMode,
    Module, ParseConfig, PythonVersion, Source,
};
use pycomments_syntax::{prettify_error, ParserError};

// ============================================================================
// CLI Structure
// ============================================================================

/// Comment-preserving parse and unparse for Python source.
///
/// Trees and check reports are written to stdout as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "pycomments",
    version,
    about = "Comment-preserving parse and unparse for Python source"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Target Python version, e.g. `3.12`, or `permissive`.
    #[arg(long, global = true, default_value = "permissive", value_parser = parse_target)]
    target: PythonVersion,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

fn parse_target(s: &str) -> Result<PythonVersion, String> {
    s.parse()
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and print the comment-enriched tree as JSON.
    Parse {
        /// Python source file.
        file: PathBuf,

        /// How comments are represented in the tree.
        #[arg(long, value_enum, default_value_t = CommentMode::Positional)]
        mode: CommentMode,
    },

    /// Parse a file and print the regenerated source.
    Unparse {
        /// Python source file.
        file: PathBuf,

        /// Drop comments from the output.
        #[arg(long)]
        strip: bool,

        /// Wrap the source in a JSON response.
        #[arg(long)]
        json: bool,
    },

    /// Verify parse -> unparse -> parse for files and directories.
    Check {
        /// Files or directories to check.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err, None);

            // Errors go to stdout as JSON like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<ExitCode, PyCommentsError> {
    let config = ParseConfig::default().with_version(cli.global.target);
    match cli.command {
        Command::Parse { file, mode } => execute_parse(&file, config.with_mode(mode)),
        Command::Unparse { file, strip, json } => execute_unparse(&file, config, strip, json),
        Command::Check { paths } => execute_check(&paths, config),
    }
}

// ============================================================================
// Command Executors
// ============================================================================

fn execute_parse(file: &Path, config: ParseConfig) -> Result<ExitCode, PyCommentsError> {
    let display = file.display().to_string();
    let module = parse_file(file, &config)?;
    let tree = serde_json::to_value(&module).map_err(|e| PyCommentsError::internal(e.to_string()))?;

    let response = ParseResponse::new(
        display,
        config.mode.to_string(),
        count_comments(&module),
        tree,
    );
    emit(&response)?;
    Ok(ExitCode::SUCCESS)
}

fn execute_unparse(
    file: &Path,
    config: ParseConfig,
    strip: bool,
    json: bool,
) -> Result<ExitCode, PyCommentsError> {
    let mut module = parse_file(file, &config)?;
    if strip {
        module = strip_comments(module);
    }
    let source = unparse_with_options(&module, &config.options)?;

    if json {
        emit(&UnparseResponse::new(file.display().to_string(), source))?;
    } else {
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", source).map_err(|e| PyCommentsError::internal(e.to_string()))?;
        let _ = stdout.flush();
    }
    Ok(ExitCode::SUCCESS)
}

fn execute_check(paths: &[PathBuf], config: ParseConfig) -> Result<ExitCode, PyCommentsError> {
    if !config.options.version.has_unparse() {
        return Err(PyCommentsError::UnparseUnavailable {
            version: config.options.version.to_string(),
        });
    }

    let files = collect_python_files(paths)?;
    tracing::info!(count = files.len(), "checking files");

    let mut results = Vec::with_capacity(files.len());
    for path in &files {
        let source = read_source(path)?;
        results.push(check_file(&path.display().to_string(), &source, &config));
    }

    let response = CheckResponse::new(results);
    emit(&response)?;
    if response.failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(OutputErrorCode::VerificationFailed.code()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Read and parse one file, printing a source excerpt for syntax errors.
fn parse_file(path: &Path, config: &ParseConfig) -> Result<Module, PyCommentsError> {
    let source = read_source(path)?;
    parse_with_config(Source::Bytes(&source), config).inspect_err(|err| {
        if let (PyCommentsError::Syntax { message, line, col }, Ok(text)) =
            (err, std::str::from_utf8(&source))
        {
            let parser_error = ParserError::ParserError {
                message: message.clone(),
                line: *line,
                col: *col,
            };
            let text = text.strip_prefix('\u{feff}').unwrap_or(text);
            let label = path.display().to_string();
            eprintln!("{}", prettify_error(&parser_error, text, &label));
        }
    })
}

fn emit<T: serde::Serialize>(response: &T) -> Result<(), PyCommentsError> {
    emit_response(response, &mut io::stdout()).map_err(|e| PyCommentsError::internal(e.to_string()))?;
    let _ = io::stdout().flush();
    Ok(())
}
