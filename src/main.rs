use clap::{Parser, Subcommand};

mod cli;

use cli::build::{cmd_build, BuildArgs};
use cli::check::{cmd_check, CheckArgs};
use cli::eval::{cmd_eval, EvalArgs};
use cli::hash::{cmd_hash, HashArgs};

#[derive(Parser)]
#[command(
    name = "pwcet",
    version,
    about = "Parametric WCET code generator for control-flow cost trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the WCET evaluation routine for a .cft tree
    Build(BuildArgs),
    /// Parse and generate without writing anything
    Check(CheckArgs),
    /// Evaluate a tree for concrete parameter values
    Eval(EvalArgs),
    /// Show content hashes of a tree and its generated routine (BLAKE3)
    Hash(HashArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => cmd_build(args),
        Command::Check(args) => cmd_check(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Hash(args) => cmd_hash(args),
    }
}
