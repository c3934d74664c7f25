// ABOUTME: Thin CLI binary: reads a PHP-JS source file (or stdin) and runs it

use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// PHP-JS: a lexer, parser, and tree-walking interpreter for a PHP-flavored
/// scripting language.
#[derive(Parser, Debug)]
#[command(name = "php-js", version = php_js::config::VERSION, about)]
struct Cli {
    /// Script file to run. Reads from stdin when omitted.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(php_js::config::DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    let source = match &cli.script {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("php-js: could not read {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut source = String::new();
            if let Err(err) = io::stdin().read_to_string(&mut source) {
                eprintln!("php-js: could not read stdin: {}", err);
                return ExitCode::FAILURE;
            }
            source
        }
    };

    print!("{}", php_js::run(&source));
    ExitCode::SUCCESS
}
