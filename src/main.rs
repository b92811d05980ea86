//! surveymerge - survey dataset consolidation
//!
//! A command line tool that merges the homelessness anxiety and demographics
//! survey datasets on the person identifier (HID) and writes the merged CSV
//! back to the bucket under processed/.

use clap::Parser;

mod cli;
mod commands;
mod error;
mod event;
mod handler;
mod merge;
mod storage;
mod table;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
