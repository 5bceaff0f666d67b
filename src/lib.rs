pub mod api;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod eval;
pub mod hash;
pub mod ir;
pub mod lower;
pub mod sink;
pub mod syntax;

// Re-exports: short `crate::X` paths for the front end
pub use config::project;
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;
pub use syntax::span;

// Re-export public API: `pwcet::compile()` etc.
pub use api::*;

use diagnostic::{render_diagnostics, Diagnostic};
use ir::Node;

/// Parse `.cft` source, rendering diagnostics against it on failure.
pub(crate) fn parse_source(source: &str, filename: &str) -> Result<Node, Vec<Diagnostic>> {
    match parser::parse_tree(source) {
        Ok(tree) => Ok(tree),
        Err(errors) => {
            render_diagnostics(&errors, filename, source);
            Err(errors)
        }
    }
}

/// Parse `.cft` source without printing anything.
pub fn parse_source_silent(source: &str) -> Result<Node, Vec<Diagnostic>> {
    parser::parse_tree(source)
}
