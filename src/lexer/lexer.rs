use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Diagnostic, DiagnosticKind},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Tried in order at the current position; longer operators precede their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^[ \t\r]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^\n").unwrap(), handler: newline_handler },
        RegexPattern { regex: Regex::new(r"^#[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^\p{L}[\p{L}\p{N}_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r#"^(?:'''|""")"#).unwrap(), handler: multiline_string_handler },
        RegexPattern { regex: Regex::new(r#"^['"]"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: semicolon_handler },
        RegexPattern { regex: Regex::new(r"^\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new(r"^\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new(r"^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(r"^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(r"^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new(r"^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new(r"^\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(r"^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^//").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashSlash, "//") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^\*\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    source: String,
    pos: usize,
    line: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            diagnostics: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    fn report(&mut self, kind: DiagnosticKind, line: u32) {
        self.diagnostics
            .push(Diagnostic::new(kind, Position(line, Rc::clone(&self.file))));
    }

    /// Length of the match of `regex` at the current position.
    fn matched_len(&self, regex: &Regex) -> usize {
        regex.find(self.remainder()).map_or(0, |found| found.end())
    }

    fn matched_text(&self, regex: &Regex) -> String {
        let len = self.matched_len(regex);
        self.remainder()[..len].to_string()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched_len(regex);
    lexer.advance_n(matched);
}

fn newline_handler(lexer: &mut Lexer, _regex: &Regex) {
    let line = lexer.line;
    lexer.advance_n(1);
    lexer.line += 1;

    match lexer.last_kind() {
        Some(kind) if !kind.is_terminator_exception() => {
            lexer.push(MK_TOKEN!(TokenKind::Semicolon, None, line));
        }
        _ => {}
    }
}

fn semicolon_handler(lexer: &mut Lexer, _regex: &Regex) {
    lexer.advance_n(1);

    if lexer.last_kind() != Some(TokenKind::Semicolon) {
        let line = lexer.line;
        lexer.push(MK_TOKEN!(TokenKind::Semicolon, None, line));
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched_text(regex);
    let line = lexer.line;
    lexer.advance_n(matched.len());

    if matched.contains('.') {
        match matched.parse::<f64>() {
            Ok(value) => lexer.push(MK_TOKEN!(
                TokenKind::RealLiteral,
                Some(TokenValue::Real(value)),
                line
            )),
            Err(_) => lexer.report(DiagnosticKind::IntegerTooLarge { literal: matched }, line),
        }
    } else {
        match matched.parse::<i64>() {
            Ok(value) => lexer.push(MK_TOKEN!(
                TokenKind::IntLiteral,
                Some(TokenValue::Int(value)),
                line
            )),
            Err(_) => lexer.report(DiagnosticKind::IntegerTooLarge { literal: matched }, line),
        }
    }
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) {
    let start_line = lexer.line;
    let Some(quote) = lexer.at() else {
        return;
    };
    lexer.advance_n(quote.len_utf8());

    let mut raw = String::new();

    loop {
        match lexer.at() {
            None | Some('\n') => {
                lexer.report(DiagnosticKind::UnterminatedString, start_line);
                return;
            }
            Some(ch) if ch == quote => {
                lexer.advance_n(ch.len_utf8());
                break;
            }
            Some('\\') => {
                raw.push('\\');
                lexer.advance_n(1);

                // An escaped quote does not close the string, an escaped newline still ends the line.
                if let Some(next) = lexer.at() {
                    if next != '\n' {
                        raw.push(next);
                        lexer.advance_n(next.len_utf8());
                    }
                }
            }
            Some(ch) => {
                raw.push(ch);
                lexer.advance_n(ch.len_utf8());
            }
        }
    }

    push_string(lexer, &raw, start_line);
}

fn multiline_string_handler(lexer: &mut Lexer, regex: &Regex) {
    let start_line = lexer.line;
    let delimiter = lexer.matched_text(regex);
    lexer.advance_n(delimiter.len());

    let mut raw = String::new();

    loop {
        if lexer.remainder().starts_with(delimiter.as_str()) {
            lexer.advance_n(delimiter.len());
            break;
        }

        match lexer.at() {
            None => {
                lexer.report(DiagnosticKind::UnterminatedMultilineString, start_line);
                return;
            }
            Some('\\') => {
                raw.push('\\');
                lexer.advance_n(1);

                if let Some(next) = lexer.at() {
                    if next == '\n' {
                        lexer.line += 1;
                    }
                    raw.push(next);
                    lexer.advance_n(next.len_utf8());
                }
            }
            Some(ch) => {
                if ch == '\n' {
                    lexer.line += 1;
                }
                raw.push(ch);
                lexer.advance_n(ch.len_utf8());
            }
        }
    }

    push_string(lexer, &raw, start_line);
}

fn push_string(lexer: &mut Lexer, raw: &str, line: u32) {
    let (value, invalid) = unescape(raw);

    for sequence in invalid {
        lexer.report(DiagnosticKind::InvalidEscape { sequence }, line);
    }

    lexer.push(MK_TOKEN!(
        TokenKind::StringLiteral,
        Some(TokenValue::Str(value)),
        line
    ));
}

/// Decodes escape sequences, returning the text and every malformed `\x` sequence.
pub fn unescape(raw: &str) -> (String, Vec<String>) {
    let mut result = String::new();
    let mut invalid = vec![];
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(next_ch) = chars.peek().copied() else {
            result.push(ch); // Keep the lone backslash
            continue;
        };

        match next_ch {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            '\\' => result.push('\\'),
            '0' => result.push('\0'),
            '\'' => result.push('\''),
            '"' => result.push('"'),
            'x' => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(digit) if digit.is_ascii_hexdigit() => {
                            hex.push(*digit);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => invalid.push(String::from("\\x")),
                }
                continue;
            }
            _ => {
                result.push(ch); // Keep the backslash
                continue;
            }
        }

        chars.next();
    }

    (result, invalid)
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched_text(regex);
    let line = lexer.line;
    lexer.advance_n(value.len());

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, None, line));
    } else {
        lexer.push(MK_TOKEN!(
            TokenKind::Identifier,
            Some(TokenValue::Str(value)),
            line
        ));
    }
}

/// Converts `source` into tokens.
///
/// Never fails: problems are returned as diagnostics next to the tokens, and
/// the token list always ends with exactly one `EOF`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str, file: Option<String>) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let Some(character) = lex.at() else {
                    break;
                };
                let line = lex.line;
                lex.report(DiagnosticKind::InvalidCharacter { character }, line);
                lex.advance_n(character.len_utf8());
            }
        }
    }

    let line = lex.line;
    lex.push(MK_TOKEN!(TokenKind::EOF, None, line));

    tracing::debug!(
        tokens = lex.tokens.len(),
        diagnostics = lex.diagnostics.len(),
        "tokenized"
    );

    (lex.tokens, lex.diagnostics)
}
