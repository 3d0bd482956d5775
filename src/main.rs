use std::path::PathBuf;
use std::{fs, io};

use clap::Parser;

/// minipy runs programs written in a small, indentation-based Python-like
/// language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the program to execute.
    #[arg(value_name = "FILE.py")]
    file: PathBuf,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let source = fs::read_to_string(&args.file).unwrap_or_else(|_| {
        eprintln!(
            "Could not open source file '{}'. Perhaps this file does not exist?",
            args.file.display()
        );
        std::process::exit(1);
    });

    tracing::debug!(file = %args.file.display(), "interpreting source file");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = minipy::run(&source, &mut out) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Initializes tracing from `MINIPY_LOG` (falling back to `RUST_LOG`,
/// then to `warn`). Evaluation progress lives in the evaluator module's
/// events, binding history in the environment module's.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("MINIPY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}
