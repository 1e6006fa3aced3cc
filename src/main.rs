//! sayit entry point

use clap::Parser;
use log::error;
use std::process;

use sayit::cli::{self, Args};
use sayit::SayitError;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args = Args::parse();

    if let Err(e) = cli::run(args) {
        match e {
            SayitError::Usage(msg) => {
                eprintln!("{}", msg);
                eprintln!("Run 'sayit --help' for usage.");
            }
            other => error!("{}", other),
        }
        process::exit(1);
    }
}
