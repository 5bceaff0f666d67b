use std::path::PathBuf;

use clap::Args;

use super::{generate_or_exit, load_tree};

#[derive(Args)]
pub struct CheckArgs {
    /// Input .cft file
    pub input: PathBuf,
    /// Print tree and routine statistics
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn cmd_check(args: CheckArgs) {
    let CheckArgs { input, verbose } = args;
    let loaded = load_tree(&input);

    let program = generate_or_exit(&loaded);

    eprintln!("OK: {}", input.display());
    if verbose {
        let stats = pwcet::GenerationStats::new(&loaded.tree, &program);
        eprintln!("{}", stats.format_report());
    }
}
