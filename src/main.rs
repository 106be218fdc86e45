use clap::Parser;
use colored::Colorize;
use rowing_star::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result.map(|_| ()).map_err(anyhow::Error::from),
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => Err(anyhow::anyhow!("Processing interrupted by user")),
                Err(e) => Err(anyhow::Error::from(e).context("Failed to listen for CTRL+C")),
            },
        }
    });

    if let Err(error) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), error);
        process::exit(1);
    }
}
