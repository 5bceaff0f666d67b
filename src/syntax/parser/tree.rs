use crate::diagnostic::Diagnostic;
use crate::ir::{Bound, Expr, LoopLevel, Node, Param};
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

use super::{parse_expr, Parser};

impl Parser {
    pub(super) fn parse_node(&mut self) -> Spanned<Node> {
        let start = self.current_span();
        if !self.enter_nesting() {
            self.exit_nesting();
            return Spanned::new(Node::zero(), start);
        }

        let node = match self.peek() {
            Lexeme::Constant => self.parse_constant(),
            Lexeme::Seq => self.parse_sequence(),
            Lexeme::Alt => self.parse_alternative(),
            Lexeme::Loop => self.parse_loop(),
            Lexeme::Conditional => self.parse_conditional(),
            other => {
                let msg = format!("expected a node, found {}", other.description());
                self.error_with_help(
                    &msg,
                    "nodes are Constant, Seq, Alt, Loop and Conditional",
                );
                Node::zero()
            }
        };

        self.exit_nesting();
        Spanned::new(node, start.merge(self.prev_span()))
    }

    /// `Constant(level, [v0, v1, ...])`
    fn parse_constant(&mut self) -> Node {
        let start = self.current_span();
        self.advance();
        self.expect(&Lexeme::LParen);
        let level = self.parse_level();
        self.expect(&Lexeme::Comma);
        self.expect(&Lexeme::LBracket);
        let mut values = Vec::new();
        while !self.at(&Lexeme::RBracket) && !self.at(&Lexeme::Eof) {
            values.push(self.parse_cost());
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RBracket);
        self.close_args();
        if values.is_empty() {
            self.diagnostics.push(
                Diagnostic::error(
                    "constant has no eta values".to_string(),
                    start.merge(self.prev_span()),
                )
                .with_help("give at least one cost, e.g. `Constant(TOP, [0])`".to_string()),
            );
        }
        Node::constant(level, values)
    }

    /// `TOP`, `-1` or a loop id.
    fn parse_level(&mut self) -> LoopLevel {
        let start = self.current_span();
        if self.eat(&Lexeme::Top) {
            return LoopLevel::Top;
        }
        if self.eat(&Lexeme::Minus) {
            let is_top = matches!(self.peek(), Lexeme::Integer(1));
            if self.at(&Lexeme::Integer(0)) {
                self.advance();
            }
            if !is_top {
                self.diagnostics.push(
                    Diagnostic::error(
                        "invalid loop level".to_string(),
                        start.merge(self.prev_span()),
                    )
                    .with_help("the only negative level is -1, meaning TOP".to_string()),
                );
            }
            return LoopLevel::Top;
        }
        LoopLevel::Loop(self.expect_u32("loop level"))
    }

    /// One slot of a constant: an optionally negated integer.
    fn parse_cost(&mut self) -> i64 {
        let start = self.current_span();
        let negative = self.eat(&Lexeme::Minus);
        let Lexeme::Integer(n) = *self.peek() else {
            self.error_at_current(&format!(
                "expected integer cost, found {}",
                self.peek().description()
            ));
            return 0;
        };
        self.advance();
        match i64::try_from(n) {
            Ok(v) if negative => -v,
            Ok(v) => v,
            Err(_) => {
                self.diagnostics.push(Diagnostic::error(
                    format!("cost {} does not fit in 64 bits", n),
                    start.merge(self.prev_span()),
                ));
                0
            }
        }
    }

    /// Closing `)` of a constructor, after an optional trailing comma.
    fn close_args(&mut self) {
        self.eat(&Lexeme::Comma);
        self.expect(&Lexeme::RParen);
    }

    /// `[node, node, ...]`
    fn parse_node_list(&mut self) -> Vec<Node> {
        self.expect(&Lexeme::LBracket);
        let mut nodes = Vec::new();
        while !self.at(&Lexeme::RBracket) && !self.at(&Lexeme::Eof) {
            nodes.push(self.parse_node().node);
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(&Lexeme::RBracket);
        nodes
    }

    /// `Seq([children])`
    fn parse_sequence(&mut self) -> Node {
        let start = self.current_span();
        self.advance();
        self.expect(&Lexeme::LParen);
        let children = self.parse_node_list();
        self.close_args();
        if children.is_empty() {
            self.diagnostics.push(
                Diagnostic::error(
                    "sequence has no children".to_string(),
                    start.merge(self.prev_span()),
                )
                .with_help("a sequence needs at least one node".to_string()),
            );
        }
        Node::sequence(children)
    }

    /// `Alt([branches])`, reduced to binary alternatives.
    fn parse_alternative(&mut self) -> Node {
        let start = self.current_span();
        self.advance();
        self.expect(&Lexeme::LParen);
        let branches = self.parse_node_list();
        self.close_args();
        match Node::alternative(branches) {
            Ok(node) => node,
            Err(err) => {
                self.diagnostics
                    .push(err.to_diagnostic(start.merge(self.prev_span())));
                Node::zero()
            }
        }
    }

    /// `Loop(body, id, bound)`
    fn parse_loop(&mut self) -> Node {
        self.advance();
        self.expect(&Lexeme::LParen);
        let body = self.parse_node().node;
        self.expect(&Lexeme::Comma);
        let id_span = self.current_span();
        let id = self.expect_u32("loop id");
        self.record_loop_id(id, id_span);
        self.expect(&Lexeme::Comma);
        let bound = self.parse_bound();
        self.close_args();
        Node::bounded_loop(body, id, bound)
    }

    fn record_loop_id(&mut self, id: u32, span: Span) {
        if let Some(first) = self.loop_ids.get(&id) {
            let first = first.start;
            self.diagnostics.push(
                Diagnostic::error(format!("loop id {} is used twice", id), span)
                    .with_note(format!("first used at byte offset {}", first))
                    .with_help("every loop needs its own id".to_string()),
            );
        } else {
            self.loop_ids.insert(id, span);
        }
    }

    /// `ConstantBound(n)`, `ParamBound("expr")` or `ParamBound(n)`.
    fn parse_bound(&mut self) -> Bound {
        match self.peek() {
            Lexeme::ConstantBound => {
                self.advance();
                self.expect(&Lexeme::LParen);
                let count = self.expect_u32("loop bound");
                self.expect(&Lexeme::RParen);
                Bound::literal(count)
            }
            Lexeme::ParamBound => {
                self.advance();
                self.expect(&Lexeme::LParen);
                let expr = match self.peek().clone() {
                    Lexeme::Integer(index) => {
                        let span = self.current_span();
                        self.advance();
                        match Param::from_index(index) {
                            Ok(param) => Expr::Param(param),
                            Err(err) => {
                                self.diagnostics.push(err.to_diagnostic(span));
                                Expr::Int(0)
                            }
                        }
                    }
                    _ => self.parse_string_expr(),
                };
                self.expect(&Lexeme::RParen);
                Bound::param(expr)
            }
            other => {
                let msg = format!("expected a loop bound, found {}", other.description());
                self.error_with_help(&msg, "use `ConstantBound(n)` or `ParamBound(\"expr\")`");
                Bound::literal(0)
            }
        }
    }

    /// `Conditional("test", subtree)`
    fn parse_conditional(&mut self) -> Node {
        self.advance();
        self.expect(&Lexeme::LParen);
        let test = self.parse_string_expr();
        self.expect(&Lexeme::Comma);
        let subtree = self.parse_node().node;
        self.close_args();
        Node::conditional(test, subtree)
    }

    /// A quoted parameter expression, parsed in place.
    fn parse_string_expr(&mut self) -> Expr {
        let Lexeme::Str(text) = self.peek().clone() else {
            self.error_at_current(&format!(
                "expected a quoted expression, found {}",
                self.peek().description()
            ));
            return Expr::Int(0);
        };
        let span = self.current_span();
        self.advance();
        match parse_expr(&text, span.start + 1) {
            Ok(expr) => expr,
            Err(errors) => {
                self.diagnostics.extend(errors);
                Expr::Int(0)
            }
        }
    }
}
