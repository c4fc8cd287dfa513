use lazy_static::lazy_static;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("class", TokenKind::Class);
        map.insert("struct", TokenKind::Struct);
        map.insert("interface", TokenKind::Interface);
        map.insert("enum", TokenKind::Enum);
        map.insert("def", TokenKind::Def);
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("int", TokenKind::Int);
        map.insert("real", TokenKind::Real);
        map.insert("str", TokenKind::Str);
        map.insert("bool", TokenKind::Bool);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("none", TokenKind::None);
        map.insert("and", TokenKind::And);
        map.insert("not", TokenKind::Not);
        map.insert("or", TokenKind::Or);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("elif", TokenKind::Elif);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map
    };

    /// Tokens after which a newline does not end the statement.
    pub static ref TERMINATOR_EXCEPTIONS: HashSet<TokenKind> = HashSet::from([
        TokenKind::Semicolon,
        TokenKind::OpenParen,
        TokenKind::OpenBracket,
        TokenKind::OpenCurly,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::Arrow,
        TokenKind::Dot,
        TokenKind::Assignment,
        TokenKind::Plus,
        TokenKind::Dash,
        TokenKind::Star,
        TokenKind::StarStar,
        TokenKind::Slash,
        TokenKind::SlashSlash,
        TokenKind::Equals,
        TokenKind::NotEquals,
        TokenKind::Less,
        TokenKind::LessEquals,
        TokenKind::Greater,
        TokenKind::GreaterEquals,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Class,
        TokenKind::Struct,
        TokenKind::Interface,
        TokenKind::Enum,
        TokenKind::Def,
        TokenKind::Let,
        TokenKind::Const,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Elif,
        TokenKind::For,
        TokenKind::While,
    ]);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntLiteral,
    RealLiteral,
    StringLiteral,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Comma,
    Dot,
    Colon,
    Semicolon,
    Arrow, // ->

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Plus,
    Dash,
    Star,
    StarStar,   // **
    Slash,
    SlashSlash, // //

    // Reserved
    Class,
    Struct,
    Interface,
    Enum,
    Def,
    Let,
    Const,
    Int,
    Real,
    Str,
    Bool,
    True,
    False,
    None,
    And,
    Not,
    Or,
    If,
    Else,
    Elif,
    For,
    While,
    Return,
    Break,
    Continue,
}

impl TokenKind {
    /// The source spelling of the token, or a description for tokens with a payload.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::EOF => "end of file",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::RealLiteral => "real literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Arrow => "->",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::SlashSlash => "//",
            TokenKind::Class => "class",
            TokenKind::Struct => "struct",
            TokenKind::Interface => "interface",
            TokenKind::Enum => "enum",
            TokenKind::Def => "def",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Int => "int",
            TokenKind::Real => "real",
            TokenKind::Str => "str",
            TokenKind::Bool => "bool",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::None => "none",
            TokenKind::And => "and",
            TokenKind::Not => "not",
            TokenKind::Or => "or",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Elif => "elif",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
        }
    }

    pub fn is_terminator_exception(&self) -> bool {
        TERMINATOR_EXCEPTIONS.contains(self)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Payload carried by literal and identifier tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Str(String),
    Int(i64),
    Real(f64),
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Str(value) => write!(f, "{}", value),
            TokenValue::Int(value) => write!(f, "{}", value),
            TokenValue::Real(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<TokenValue>,
    pub line: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} ({}) @ {}", self.kind, value, self.line),
            None => write!(f, "{} @ {}", self.kind, self.line),
        }
    }
}

impl Token {
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Token {
            kind,
            value: None,
            line,
        }
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// The text payload of identifiers and string literals.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// How the token is named in diagnostics.
    pub fn lexeme(&self) -> String {
        match (&self.kind, &self.value) {
            (TokenKind::StringLiteral, Some(value)) => format!("'{}'", value),
            (_, Some(value)) => value.to_string(),
            (kind, None) => kind.symbol().to_string(),
        }
    }
}
