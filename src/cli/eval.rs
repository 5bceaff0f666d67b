use std::path::PathBuf;
use std::process;

use clap::Args;
use pwcet::eval::{ParamAssignment, ParamValues};

use super::load_tree;

#[derive(Args)]
pub struct EvalArgs {
    /// Input .cft file
    pub input: PathBuf,
    /// Parameter value as N=VALUE or param_N=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_name = "N=VALUE")]
    pub params: Vec<ParamAssignment>,
}

pub fn cmd_eval(args: EvalArgs) {
    let EvalArgs { input, params } = args;
    let loaded = load_tree(&input);
    let values: ParamValues = params.into_iter().collect();

    match pwcet::evaluate_tree(&loaded.tree, &values) {
        Ok(eval) => {
            let slots: Vec<String> = eval.reference.slots().iter().map(|v| v.to_string()).collect();
            eprintln!("eta:   [{}]", slots.join(", "));
            eprintln!("level: {}", eval.level);
            println!("{}", eval.result);
        }
        Err(e) => {
            e.render(&loaded.filename, &loaded.source);
            process::exit(1);
        }
    }
}
