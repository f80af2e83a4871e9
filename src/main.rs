use clap::{Parser, Subcommand};

use crate::batch::Batch;
use crate::generate::Generate;
use crate::solve::Solve;

mod batch;
mod construction;
mod generate;
mod grasp;
mod instance_data;
mod local_search;
mod solution;
mod solve;
mod utils;

/// GRASP toolkit for the capacitated single-item lot-sizing problem.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct CsilspTools {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a benchmark grid of instances
    Generate(Generate),
    /// Solve a single instance
    Solve(Solve),
    /// Solve every instance under a directory tree
    Batch(Batch),
}

fn main() {
    let cli = CsilspTools::parse();
    let result = match cli.command {
        Command::Generate(generate) => generate.generate(),
        Command::Solve(solve) => solve.solve(),
        Command::Batch(batch) => batch.run(),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
