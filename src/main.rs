mod arima_cmd;
mod boost_cmd;
mod cli;
mod config;
mod convert;
mod data;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Arima(args) => arima_cmd::run(args),
        Command::Boost(args) => boost_cmd::run(args),
    }
}
