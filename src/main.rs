use clap::Parser;
use colored::*;
use envoy_to_harald::cli::Cli;
use envoy_to_harald::{convert, ConvertOptions};
use std::io::{self, IsTerminal, Write};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "envoy_to_harald=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        colored::control::set_override(io::stderr().is_terminal());
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let output = convert(&cli.input, ConvertOptions::default()).map_err(|e| e.to_string())?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| format!("write output: {}", e))
}
