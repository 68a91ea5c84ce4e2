//! The Slate command-line driver.
//!
//! Provides the `slatec` command with the following subcommands:
//!
//! - `slatec parse [FILE|-]` - Parse a document and print its IR as JSON
//! - `slatec check [FILE|-]` - Validate a document and report diagnostics
//!
//! `parse --chunk-size N` feeds the input through the streaming path in
//! N-byte chunks, which is how the library is exercised in production
//! (model output arrives incrementally); the result is identical to
//! parsing the whole document at once.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use slate::render::render_diagnostics;
use slate::{noise, ParseOptions, Severity, StreamParser};

#[derive(Parser)]
#[command(name = "slatec", version, about = "Parse and check Slate documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print its IR as JSON
    Parse {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Strip conversational noise and code fences before parsing
        #[arg(long)]
        strip: bool,

        /// Feed the input in fixed-size chunks through the streaming path
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<usize>,

        /// Spaces per indent level
        #[arg(long, default_value_t = 2)]
        indent_size: u32,

        /// Exit non-zero when any error-severity diagnostic was recorded
        #[arg(long)]
        strict: bool,
    },
    /// Validate a document and report diagnostics
    Check {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Spaces per indent level
        #[arg(long, default_value_t = 2)]
        indent_size: u32,

        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Parse { input, pretty, strip, chunk_size, indent_size, strict } => {
            run_parse(&input, pretty, strip, chunk_size, indent_size, strict)
        }
        Commands::Check { input, indent_size, strict } => run_check(&input, indent_size, strict),
    };

    if let Err(message) = outcome {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn run_parse(
    input: &Path,
    pretty: bool,
    strip: bool,
    chunk_size: Option<usize>,
    indent_size: u32,
    strict: bool,
) -> Result<(), String> {
    let raw = read_input(input)?;
    let text = if strip { noise::strip(&raw) } else { raw.as_str() };

    let options = ParseOptions { indent_size, strict, ..Default::default() };
    let mut parser = StreamParser::with_options(options);
    match chunk_size {
        Some(size) => {
            for chunk in chunks(text, size.max(1)) {
                parser.write(chunk);
            }
        }
        None => parser.write(text),
    }
    let result = parser.end();

    if !result.errors.is_empty() {
        eprint!("{}", render_diagnostics(text, &result.errors));
    }
    let json = if pretty {
        serde_json::to_string_pretty(&result.value)
    } else {
        serde_json::to_string(&result.value)
    }
    .map_err(|e| format!("failed to serialize IR: {}", e))?;
    println!("{}", json);

    let has_errors = result.errors.iter().any(|d| d.severity == Severity::Error);
    if strict && has_errors {
        return Err("input has errors".to_string());
    }
    Ok(())
}

fn run_check(input: &Path, indent_size: u32, strict: bool) -> Result<(), String> {
    let text = read_input(input)?;
    let options = ParseOptions { indent_size, strict, ..Default::default() };
    match slate::validate(&text, options) {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(diagnostics) => {
            eprint!("{}", render_diagnostics(&text, &diagnostics));
            Err(format!("{} problem(s) found", diagnostics.len()))
        }
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))
    }
}

/// Split `text` into chunks of roughly `size` bytes, never inside a UTF-8
/// character.
fn chunks(text: &str, size: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(&text[start..end]);
        start = end;
    }
    out
}
