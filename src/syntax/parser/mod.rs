mod expr;
mod tree;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::diagnostic::Diagnostic;
use crate::ir::{Expr, Node};
use crate::lexeme::Lexeme;
use crate::lexer::Lexer;
use crate::span::{Span, Spanned};

const MAX_NESTING_DEPTH: u32 = 256;

pub(crate) struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
    /// First occurrence of every loop id seen so far.
    loop_ids: HashMap<u32, Span>,
}

/// Parse a whole `.cft` source into its root node.
pub fn parse_tree(source: &str) -> Result<Node, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    let mut parser = Parser::new(tokens);
    if parser.at(&Lexeme::Eof) {
        parser.error_with_help(
            "expected a cost tree, found end of file",
            "a file holds one root node, e.g. `Constant(TOP, [1])`",
        );
        return Err(parser.diagnostics);
    }
    let root = parser.parse_node();
    if !parser.at(&Lexeme::Eof) {
        parser.error_with_help(
            &format!("unexpected {} after the root node", parser.peek().description()),
            "wrap several nodes in `Seq([...])`",
        );
    }
    parser.finish(root.node)
}

/// Parse a parameter expression whose text starts at byte `base` of the
/// enclosing source, so diagnostics point into that source.
pub(crate) fn parse_expr(text: &str, base: u32) -> Result<Expr, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::with_offset(text, base).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr();
    if !parser.at(&Lexeme::Eof) {
        parser.error_at_current(&format!(
            "unexpected {} after expression",
            parser.peek().description()
        ));
    }
    parser.finish(expr.node)
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
            loop_ids: HashMap::new(),
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() {
            Ok(value)
        } else {
            Err(self.diagnostics)
        }
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "split the tree or simplify the expression",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    // --- Utility methods ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    /// An unsigned integer that must fit in `u32`; `what` names it in errors.
    fn expect_u32(&mut self, what: &str) -> u32 {
        if let Lexeme::Integer(n) = *self.peek() {
            let span = self.current_span();
            self.advance();
            match u32::try_from(n) {
                Ok(n) => n,
                Err(_) => {
                    self.diagnostics.push(
                        Diagnostic::error(format!("{} {} is out of range", what, n), span)
                            .with_help(format!("the maximum {} is {}", what, u32::MAX)),
                    );
                    0
                }
            }
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                what,
                self.peek().description()
            ));
            0
        }
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}
