use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use interplay::{config::InterpreterConfig, load_document_file};

/// interplay loads a literate document, evaluates its code and prints the
/// interaction it describes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Prints the stored file block with this name instead of the
    /// interaction.
    #[arg(short, long)]
    file: Option<String>,

    /// Runs every output analyzer of the document against the lines of this
    /// file and exits with a failure if any check fails.
    #[arg(short, long)]
    check: Option<PathBuf>,

    /// Adds a package searched for unqualified type names.
    #[arg(short, long = "package")]
    packages: Vec<String>,

    /// Starts documents without the default host library.
    #[arg(long)]
    no_builtins: bool,

    document: PathBuf,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry().with(fmt::layer().with_target(true).with_level(true))
                                      .with(filter)
                                      .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut config = args.packages
                         .iter()
                         .fold(InterpreterConfig::default(), |config, package| {
                             config.with_package(package)
                         });
    if args.no_builtins {
        config = config.without_builtins();
    }

    let document = match load_document_file(&args.document, &config) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    if let Some(name) = &args.file {
        let Some(lines) = document.file(name) else {
            eprintln!("The document stores no file named '{name}'.");
            return ExitCode::FAILURE;
        };
        for line in lines {
            println!("{line}");
        }
        return ExitCode::SUCCESS;
    }

    if let Some(path) = &args.check {
        let output: Vec<String> = match fs::read_to_string(path) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(e) => {
                eprintln!("Failed to read the output file '{}': {e}", path.display());
                return ExitCode::FAILURE;
            },
        };

        let failures = document.analyze(&output);
        for failure in &failures {
            eprintln!("{failure}");
        }
        return if failures.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    for entry in document.entries() {
        print!("{entry}");
    }

    ExitCode::SUCCESS
}
