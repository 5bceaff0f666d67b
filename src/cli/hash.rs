use std::path::PathBuf;

use clap::Args;

use super::{generate_or_exit, load_tree, lower_or_exit, resolve_options};

#[derive(Args)]
pub struct HashArgs {
    /// Input .cft file
    pub input: PathBuf,
    /// Show full 256-bit hashes instead of short form
    #[arg(long)]
    pub full: bool,
}

pub fn cmd_hash(args: HashArgs) {
    let HashArgs { input, full } = args;
    let options = resolve_options(&input, None, None);
    let loaded = load_tree(&input);

    let program = generate_or_exit(&loaded);
    let text = lower_or_exit(&program, &options);

    let hashes = pwcet::hash_artifacts(&loaded.tree, &text);
    if full {
        println!("tree:   {} {}", hashes.tree.to_hex(), input.display());
        println!("{}: {} {}", options.target, hashes.output.to_hex(), options.function_name);
    } else {
        println!("tree:   {} {}", hashes.tree, input.display());
        println!("{}: {} {}", options.target, hashes.output, options.function_name);
    }
}
