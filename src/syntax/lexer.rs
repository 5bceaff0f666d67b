use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

pub(crate) struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    /// Added to every span; non-zero when lexing the inside of a string.
    base: u32,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self::with_offset(source, 0)
    }

    /// Lex `source` as if it started at byte `base` of an enclosing file.
    pub(crate) fn with_offset(source: &'src str, base: u32) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            base,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit() {
                return self.scan_number();
            }

            if ch == b'"' {
                return self.scan_string();
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            let line_comment = match self.source.get(self.pos) {
                Some(b'#') => true,
                Some(b'/') => self.source.get(self.pos + 1) == Some(&b'/'),
                _ => false,
            };
            if line_comment {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            break;
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        let token = Lexeme::from_keyword(&text).unwrap_or(Lexeme::Ident(text));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        match text.parse::<u64>() {
            Ok(n) => self.make_token(Lexeme::Integer(n), start, self.pos),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("integer literal '{}' is too large", text),
                        self.span(start, self.pos),
                    )
                    .with_help(format!("maximum integer value is {}", u64::MAX)),
                );
                self.make_token(Lexeme::Integer(0), start, self.pos)
            }
        }
    }

    fn scan_string(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        self.pos += 1; // opening quote
        while self.pos < self.source.len() && self.source[self.pos] != b'"' {
            if self.source[self.pos] == b'\n' {
                break;
            }
            self.pos += 1;
        }
        let body = String::from_utf8_lossy(&self.source[start + 1..self.pos]).into_owned();
        if self.peek() == Some(b'"') {
            self.pos += 1;
        } else {
            self.diagnostics.push(
                Diagnostic::error(
                    "unterminated string literal".to_string(),
                    self.span(start, self.pos),
                )
                .with_help("close the expression with '\"' on the same line".to_string()),
            );
        }
        self.make_token(Lexeme::Str(body), start, self.pos)
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'[' => Lexeme::LBracket,
            b']' => Lexeme::RBracket,
            b',' => Lexeme::Comma,
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'%' => Lexeme::Percent,
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::EqEq
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unexpected '='; expressions cannot assign".to_string(),
                            self.span(start, self.pos),
                        )
                        .with_help("use '==' to compare values".to_string()),
                    );
                    return None;
                }
            }
            b'!' => self.pick(b'=', Lexeme::BangEq, Lexeme::Bang),
            b'<' => self.pick(b'=', Lexeme::LtEq, Lexeme::Lt),
            b'>' => self.pick(b'=', Lexeme::GtEq, Lexeme::Gt),
            b'&' | b'|' => {
                if self.peek() == Some(ch) {
                    self.pos += 1;
                    if ch == b'&' {
                        Lexeme::AmpAmp
                    } else {
                        Lexeme::PipePipe
                    }
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            format!("unexpected '{}'; bitwise operators are not supported", ch as char),
                            self.span(start, self.pos),
                        )
                        .with_help(format!(
                            "use '{0}{0}' for the logical operator",
                            ch as char
                        )),
                    );
                    return None;
                }
            }
            _ => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}' (U+{:04X})", ch as char, ch),
                        self.span(start, self.pos),
                    )
                    .with_help("this character is not part of the cost-tree notation".to_string()),
                );
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    /// Two-character operator if the next byte is `next`, else the single one.
    fn pick(&mut self, next: u8, double: Lexeme, single: Lexeme) -> Lexeme {
        if self.peek() == Some(next) {
            self.pos += 1;
            double
        } else {
            single
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span::new(start as u32, end as u32).shifted(self.base)
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, self.span(start, end))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
