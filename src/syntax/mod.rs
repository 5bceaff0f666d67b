//! Front end for the `.cft` cost-tree notation and parameter expressions.

pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod span;
