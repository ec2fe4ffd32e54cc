//! Token definitions using logos

use crate::common::Span;
use logos::Logos;
use std::fmt;

/// A token with its kind and source location
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds for the Kotlin declaration subset
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum TokenKind {
    // Keywords - Structure
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("object")]
    Object,
    #[token("companion")]
    Companion,
    #[token("enum")]
    Enum,
    #[token("fun")]
    Fun,
    #[token("constructor")]
    Constructor,
    #[token("init")]
    Init,

    // Keywords - Properties
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("by")]
    By,
    #[token("get")]
    Get,
    #[token("set")]
    Set,

    // Keywords - Modifiers
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("internal")]
    Internal,
    #[token("open")]
    Open,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("sealed")]
    Sealed,
    #[token("data")]
    Data,
    #[token("override")]
    Override,
    #[token("lateinit")]
    Lateinit,
    #[token("const")]
    Const,
    #[token("annotation")]
    Annotation,

    // Keywords - Expressions
    #[token("this")]
    This,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("is")]
    Is,
    #[token("as")]
    As,
    #[token("in")]
    In,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", priority = 3, callback = |lex| lex.slice().to_string())]
    HexLiteral(String),
    #[regex(r"0[bB][01][01_]*", priority = 3, callback = |lex| lex.slice().to_string())]
    BinaryLiteral(String),
    #[regex(r"[0-9][0-9_]*[uU]?L?", priority = 2, callback = |lex| lex.slice().to_string())]
    IntLiteral(String),
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[fF]?", priority = 3, callback = |lex| lex.slice().to_string())]
    FloatLiteral(String),
    #[regex(r"'([^'\\]|\\.)'", callback = |lex| lex.slice().to_string())]
    CharLiteral(String),
    #[regex(r#""([^"\\]|\\.)*""#, callback = |lex| lex.slice().to_string())]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 1, callback = |lex| lex.slice().to_string())]
    Identifier(String),

    // Multi-character operators (order matters - longer first)
    #[token("?.")]
    SafeDot,
    #[token("?:")]
    Elvis,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("..")]
    DotDot,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("@")]
    At,
    #[token("?")]
    Question,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Punctuation
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

impl TokenKind {
    /// True for tokens that can start a declaration modifier list
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Internal
                | TokenKind::Open
                | TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Sealed
                | TokenKind::Data
                | TokenKind::Override
                | TokenKind::Lateinit
                | TokenKind::Const
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Package => write!(f, "package"),
            TokenKind::Import => write!(f, "import"),
            TokenKind::Class => write!(f, "class"),
            TokenKind::Interface => write!(f, "interface"),
            TokenKind::Object => write!(f, "object"),
            TokenKind::Companion => write!(f, "companion"),
            TokenKind::Enum => write!(f, "enum"),
            TokenKind::Fun => write!(f, "fun"),
            TokenKind::Constructor => write!(f, "constructor"),
            TokenKind::Init => write!(f, "init"),
            TokenKind::Val => write!(f, "val"),
            TokenKind::Var => write!(f, "var"),
            TokenKind::By => write!(f, "by"),
            TokenKind::Get => write!(f, "get"),
            TokenKind::Set => write!(f, "set"),
            TokenKind::Public => write!(f, "public"),
            TokenKind::Private => write!(f, "private"),
            TokenKind::Protected => write!(f, "protected"),
            TokenKind::Internal => write!(f, "internal"),
            TokenKind::Open => write!(f, "open"),
            TokenKind::Abstract => write!(f, "abstract"),
            TokenKind::Final => write!(f, "final"),
            TokenKind::Sealed => write!(f, "sealed"),
            TokenKind::Data => write!(f, "data"),
            TokenKind::Override => write!(f, "override"),
            TokenKind::Lateinit => write!(f, "lateinit"),
            TokenKind::Const => write!(f, "const"),
            TokenKind::Annotation => write!(f, "annotation"),
            TokenKind::This => write!(f, "this"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Is => write!(f, "is"),
            TokenKind::As => write!(f, "as"),
            TokenKind::In => write!(f, "in"),
            TokenKind::HexLiteral(s) => write!(f, "{}", s),
            TokenKind::BinaryLiteral(s) => write!(f, "{}", s),
            TokenKind::IntLiteral(s) => write!(f, "{}", s),
            TokenKind::FloatLiteral(s) => write!(f, "{}", s),
            TokenKind::CharLiteral(s) => write!(f, "{}", s),
            TokenKind::StringLiteral(s) => write!(f, "{}", s),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::SafeDot => write!(f, "?."),
            TokenKind::Elvis => write!(f, "?:"),
            TokenKind::ColonColon => write!(f, "::"),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::DotDot => write!(f, ".."),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::AmpAmp => write!(f, "&&"),
            TokenKind::PipePipe => write!(f, "||"),
            TokenKind::PlusPlus => write!(f, "++"),
            TokenKind::MinusMinus => write!(f, "--"),
            TokenKind::PlusEq => write!(f, "+="),
            TokenKind::MinusEq => write!(f, "-="),
            TokenKind::StarEq => write!(f, "*="),
            TokenKind::SlashEq => write!(f, "/="),
            TokenKind::PercentEq => write!(f, "%="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::At => write!(f, "@"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}
