//! slidemark - Main Entry Point
//!
//! Renders a Markdown slide deck to standalone HTML.

use std::process;

use clap::Parser;
use log::{error, info};

use slidemark::cli::{self, Args};

/// Application name constant.
const APP_NAME: &str = "slidemark";

fn main() {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    if let Err(err) = cli::run(&args) {
        error!("{}", err);
        process::exit(1);
    }
}
