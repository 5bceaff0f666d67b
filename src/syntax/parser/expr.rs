use crate::diagnostic::Diagnostic;
use crate::ir::{BinOp, Expr, Param, UnOp};
use crate::lexeme::Lexeme;
use crate::span::Spanned;

use super::Parser;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Spanned<Expr> {
        if !self.enter_nesting() {
            let span = self.current_span();
            self.exit_nesting();
            return Spanned::new(Expr::Int(0), span);
        }
        let mut lhs = self.parse_unary();

        loop {
            let op = match self.peek() {
                Lexeme::PipePipe => BinOp::Or,
                Lexeme::AmpAmp => BinOp::And,
                Lexeme::EqEq => BinOp::Eq,
                Lexeme::BangEq => BinOp::Ne,
                Lexeme::Lt => BinOp::Lt,
                Lexeme::LtEq => BinOp::Le,
                Lexeme::Gt => BinOp::Gt,
                Lexeme::GtEq => BinOp::Ge,
                Lexeme::Plus => BinOp::Add,
                Lexeme::Minus => BinOp::Sub,
                Lexeme::Star => BinOp::Mul,
                Lexeme::Slash => BinOp::Div,
                Lexeme::Percent => BinOp::Rem,
                _ => break,
            };

            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator
            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(Expr::binary(op, lhs.node, rhs.node), span);
        }

        self.exit_nesting();
        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Lexeme::Minus => UnOp::Neg,
            Lexeme::Bang => UnOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        if !self.enter_nesting() {
            self.exit_nesting();
            return Spanned::new(Expr::Int(0), start);
        }
        let operand = self.parse_unary();
        self.exit_nesting();
        let span = start.merge(operand.span);
        let node = match (op, operand.node) {
            // Literals are non-negative, so this cannot overflow.
            (UnOp::Neg, Expr::Int(n)) => Expr::Int(-n),
            (op, inner) => Expr::Unary(op, Box::new(inner)),
        };
        Spanned::new(node, span)
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        match self.peek().clone() {
            Lexeme::Integer(n) => {
                self.advance();
                match i64::try_from(n) {
                    Ok(n) => Spanned::new(Expr::Int(n), start),
                    Err(_) => {
                        self.diagnostics.push(
                            Diagnostic::error(
                                format!("integer literal {} does not fit in 64 bits", n),
                                start,
                            )
                            .with_help(format!("the maximum value is {}", i64::MAX)),
                        );
                        Spanned::new(Expr::Int(0), start)
                    }
                }
            }
            Lexeme::Ident(name) => {
                self.advance();
                match Param::from_name(&name) {
                    Ok(param) => Spanned::new(Expr::Param(param), start),
                    Err(err) => {
                        self.diagnostics.push(err.to_diagnostic(start));
                        Spanned::new(Expr::Int(0), start)
                    }
                }
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(&Lexeme::RParen);
                Spanned::new(inner.node, start.merge(self.prev_span()))
            }
            other => {
                self.error_with_help(
                    &format!("expected expression, found {}", other.description()),
                    "expressions use integers, `param_0` .. `param_3` and C operators",
                );
                Spanned::new(Expr::Int(0), start)
            }
        }
    }
}
