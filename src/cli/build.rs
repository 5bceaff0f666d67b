use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{generate_or_exit, load_tree, lower_or_exit, resolve_options};

#[derive(Args)]
pub struct BuildArgs {
    /// Input .cft file
    pub input: PathBuf,
    /// Output file (default: <input>.c or <input>.rs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Target language: c or rust (default: from pwcet.toml, else c)
    #[arg(long)]
    pub target: Option<String>,
    /// Name of the generated routine (default: from pwcet.toml, else eval)
    #[arg(long)]
    pub name: Option<String>,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        target,
        name,
    } = args;
    let options = resolve_options(&input, target, name);
    let lowering = match pwcet::lower::create_lowering(&options.target) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let loaded = load_tree(&input);
    let program = generate_or_exit(&loaded);
    let text = lower_or_exit(&program, &options);

    let out_path = output.unwrap_or_else(|| input.with_extension(lowering.extension()));
    if let Err(e) = std::fs::write(&out_path, &text) {
        eprintln!("error: cannot write '{}': {}", out_path.display(), e);
        process::exit(1);
    }
    eprintln!(
        "Wrote {} ({} variables, {} parameters)",
        out_path.display(),
        program.declarations.len(),
        program.params.len()
    );
}
