/// All lexemes of the cost-tree notation and of parameter expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Node constructors
    Constant,
    Seq,
    Alt,
    Loop,
    Conditional,
    ConstantBound,
    ParamBound,
    Top,

    // Symbols
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    EqEq,     // ==
    BangEq,   // !=
    Bang,     // !
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=
    AmpAmp,   // &&
    PipePipe, // ||

    // Literals
    Integer(u64),
    Str(String),
    Ident(String),

    // End of input
    Eof,
}

impl Lexeme {
    /// Match an identifier against the node constructor names.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "Constant" => Some(Lexeme::Constant),
            "Seq" | "Sequence" => Some(Lexeme::Seq),
            "Alt" | "Alternative" => Some(Lexeme::Alt),
            "Loop" => Some(Lexeme::Loop),
            "Conditional" => Some(Lexeme::Conditional),
            "ConstantBound" => Some(Lexeme::ConstantBound),
            "ParamBound" => Some(Lexeme::ParamBound),
            "TOP" => Some(Lexeme::Top),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Lexeme::Constant => "'Constant'",
            Lexeme::Seq => "'Seq'",
            Lexeme::Alt => "'Alt'",
            Lexeme::Loop => "'Loop'",
            Lexeme::Conditional => "'Conditional'",
            Lexeme::ConstantBound => "'ConstantBound'",
            Lexeme::ParamBound => "'ParamBound'",
            Lexeme::Top => "'TOP'",
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::LBracket => "'['",
            Lexeme::RBracket => "']'",
            Lexeme::Comma => "','",
            Lexeme::Plus => "'+'",
            Lexeme::Minus => "'-'",
            Lexeme::Star => "'*'",
            Lexeme::Slash => "'/'",
            Lexeme::Percent => "'%'",
            Lexeme::EqEq => "'=='",
            Lexeme::BangEq => "'!='",
            Lexeme::Bang => "'!'",
            Lexeme::Lt => "'<'",
            Lexeme::LtEq => "'<='",
            Lexeme::Gt => "'>'",
            Lexeme::GtEq => "'>='",
            Lexeme::AmpAmp => "'&&'",
            Lexeme::PipePipe => "'||'",
            Lexeme::Integer(_) => "integer literal",
            Lexeme::Str(_) => "string literal",
            Lexeme::Ident(_) => "identifier",
            Lexeme::Eof => "end of file",
        }
    }
}
