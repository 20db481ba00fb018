//! `cobra` command-line entry point.

mod compile;
mod config;

use clap::Parser;
use compile::CompileArgs;
use config::CobraConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only compiled output.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = CompileArgs::parse();

    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = CobraConfig::load(&root);
    init_tracing(config.log_level());
    tracing::debug!(?config, "loaded config");

    match compile::run(&args, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
