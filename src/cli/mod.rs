pub mod build;
pub mod check;
pub mod eval;
pub mod hash;

use std::path::Path;
use std::process;

use pwcet::diagnostic::render_diagnostics;
use pwcet::ir::{Node, Program};
use pwcet::project::Project;
use pwcet::GenerateOptions;

/// A loaded input: its text, display name and parsed tree.
pub struct LoadedTree {
    pub source: String,
    pub filename: String,
    pub tree: Node,
}

/// Read a .cft file, exiting on error.
pub fn load_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Read and parse a .cft file, rendering diagnostics and exiting on error.
pub fn load_tree(path: &Path) -> LoadedTree {
    let source = load_source(path);
    let filename = path.to_string_lossy().to_string();
    match pwcet::parse_source_silent(&source) {
        Ok(tree) => LoadedTree {
            source,
            filename,
            tree,
        },
        Err(errors) => {
            render_diagnostics(&errors, &filename, &source);
            eprintln!("error: parse errors in '{}'", path.display());
            process::exit(1);
        }
    }
}

/// Options for an input: pwcet.toml next to or above it, then flags.
pub fn resolve_options(input: &Path, target: Option<String>, name: Option<String>) -> GenerateOptions {
    let project = match Project::for_input(input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let mut options = GenerateOptions::from_project(&project);
    if let Some(target) = target {
        options.target = target;
    }
    if let Some(name) = name {
        options.function_name = name;
    }
    options
}

/// Generate the routine for a loaded tree, exiting on error.
pub fn generate_or_exit(loaded: &LoadedTree) -> Program {
    match pwcet::generate_tree(&loaded.tree) {
        Ok(p) => p,
        Err(errors) => {
            render_diagnostics(&errors, &loaded.filename, &loaded.source);
            process::exit(1);
        }
    }
}

/// Render a generated routine, exiting on error.
pub fn lower_or_exit(program: &Program, options: &GenerateOptions) -> String {
    match pwcet::lower_program(program, options) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
