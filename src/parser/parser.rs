//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//! While it builds the AST it also declares every scope and symbol in the
//! symbol table it hands to the type checker.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Syntax errors never stop the parse. A failed expectation records a
//! diagnostic and unwinds the current statement as a [`ParseFailure`]; the
//! statement loop then skips ahead to the next statement boundary.

use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::Stmt,
        types::{LiteralValue, Type},
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
    symbols::{
        builtins::register_builtins, interner::SymbolInterner, symbol_table::SymbolTable,
        ScopeIndex, SymbolId,
    },
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_statements,
};

/// Upper bound on parameters of a function and arguments of a call.
pub const MAX_ARGUMENTS: usize = u16::MAX as usize;

/// Tokens that start a statement; recovery stops in front of them.
const SYNC_TOKENS: [TokenKind; 9] = [
    TokenKind::Class,
    TokenKind::Struct,
    TokenKind::Interface,
    TokenKind::Enum,
    TokenKind::Def,
    TokenKind::For,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Return,
];

/// Marker for a statement abandoned after a syntax error.
///
/// The diagnostic has already been recorded when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailure;

pub type ParseResult<T> = Result<T, ParseFailure>;

/// Everything the parser produced.
#[derive(Debug)]
pub struct ParseOutput {
    pub statements: Vec<Stmt>,
    pub symbol_table: SymbolTable,
    pub names: SymbolInterner,
    pub diagnostics: Vec<Diagnostic>,
}

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements and expressions. It tracks the current position in
/// the token stream and owns the symbol table under construction.
pub struct Parser {
    /// The list of tokens to parse, always ending with `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    symbol_table: SymbolTable,
    names: SymbolInterner,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// The built-in functions are declared in the root scope before any
    /// user code is seen.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::new(TokenKind::EOF, line));
        }

        let mut symbol_table = SymbolTable::new();
        let mut names = SymbolInterner::new();
        register_builtins(&mut symbol_table, &mut names);

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            symbol_table,
            names,
            diagnostics: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` positions ahead.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::EOF, |token| token.kind)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The parser never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if index + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Consumes the current token if it is of `kind`.
    pub fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a token of the specified kind, failing with a custom diagnostic.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: DiagnosticKind,
    ) -> ParseResult<Token> {
        if self.current_token_kind() != expected_kind {
            Err(self.error(error))
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind, describing what was wanted.
    pub fn expect(&mut self, expected_kind: TokenKind, message: &str) -> ParseResult<Token> {
        let error = DiagnosticKind::UnexpectedToken {
            token: self.current_token().lexeme(),
            message: message.to_string(),
        };
        self.expect_error(expected_kind, error)
    }

    /// Ends a statement: consumes a `;`, or accepts a `}` or `EOF` without consuming it.
    pub fn expect_terminator(&mut self, message: &str) -> ParseResult<()> {
        match self.current_token_kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::CloseCurly | TokenKind::EOF => Ok(()),
            _ => self.expect(TokenKind::Semicolon, message).map(|_| ()),
        }
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        Position(self.current_token().line, Rc::clone(&self.file))
    }

    /// Records a diagnostic on the current token's line.
    pub fn report(&mut self, kind: DiagnosticKind) {
        let position = self.get_position();
        self.diagnostics.push(Diagnostic::new(kind, position));
    }

    pub fn report_at(&mut self, kind: DiagnosticKind, line: u32) {
        self.diagnostics
            .push(Diagnostic::new(kind, Position(line, Rc::clone(&self.file))));
    }

    /// Records a diagnostic and returns the failure that abandons the statement.
    pub fn error(&mut self, kind: DiagnosticKind) -> ParseFailure {
        self.report(kind);
        ParseFailure
    }

    pub fn error_at(&mut self, kind: DiagnosticKind, line: u32) -> ParseFailure {
        self.report_at(kind, line);
        ParseFailure
    }

    /// Skips to the next statement boundary after a syntax error.
    ///
    /// Moves at least one token unless the parser sits on a `}` or `EOF`,
    /// then stops right after a `;`, or in front of `}`, `EOF` or a token
    /// that starts a statement.
    pub fn synchronize(&mut self) {
        let mut previous = match self.current_token_kind() {
            TokenKind::CloseCurly | TokenKind::EOF => return,
            _ => self.advance().kind,
        };

        loop {
            if previous == TokenKind::Semicolon {
                return;
            }

            let kind = self.current_token_kind();
            if matches!(kind, TokenKind::CloseCurly | TokenKind::EOF) || SYNC_TOKENS.contains(&kind)
            {
                return;
            }
            previous = self.advance().kind;
        }
    }

    pub fn intern(&mut self, name: &str) -> SymbolId {
        self.names.intern(name)
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }

    /// Moves the scope cursor back to where an abandoned statement started.
    pub fn restore_scope(&mut self, scope: ScopeIndex) {
        if let Err(error) = self.symbol_table.enter_scope(scope) {
            tracing::error!(%error, "cannot restore scope after syntax error");
        }
    }

    fn check_redeclaration(&mut self, symbol: SymbolId, name: &str, line: u32) -> ParseResult<()> {
        if self.symbol_table.declared_in_current(symbol) {
            return Err(self.error_at(
                DiagnosticKind::AlreadyDeclared {
                    name: name.to_string(),
                },
                line,
            ));
        }
        Ok(())
    }

    /// Declares a variable in the current scope.
    pub fn declare_variable(
        &mut self,
        symbol: SymbolId,
        name: &str,
        declared_type: Option<Type>,
        line: u32,
    ) -> ParseResult<()> {
        self.check_redeclaration(symbol, name, line)?;
        match self.symbol_table.register_variable(symbol, declared_type) {
            Ok(_) => Ok(()),
            Err(_) => Err(self.error_at(
                DiagnosticKind::AlreadyDeclared {
                    name: name.to_string(),
                },
                line,
            )),
        }
    }

    /// Declares a parameter in the current (function) scope.
    pub fn declare_parameter(
        &mut self,
        symbol: SymbolId,
        name: &str,
        type_: Type,
        line: u32,
    ) -> ParseResult<()> {
        self.check_redeclaration(symbol, name, line)?;
        match self.symbol_table.register_parameter(symbol, type_) {
            Ok(_) => Ok(()),
            Err(_) => Err(self.error_at(
                DiagnosticKind::AlreadyDeclared {
                    name: name.to_string(),
                },
                line,
            )),
        }
    }

    /// Declares a constant in the current scope.
    pub fn declare_constant(
        &mut self,
        symbol: SymbolId,
        name: &str,
        value: LiteralValue,
        type_: Type,
        line: u32,
    ) -> ParseResult<()> {
        self.check_redeclaration(symbol, name, line)?;
        match self.symbol_table.register_constant(symbol, value, type_) {
            Ok(_) => Ok(()),
            Err(_) => Err(self.error_at(
                DiagnosticKind::AlreadyDeclared {
                    name: name.to_string(),
                },
                line,
            )),
        }
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix handlers leave the binding power table alone, so `-` and `(`
    /// keep the precedence of their infix forms.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    fn finish(self, statements: Vec<Stmt>) -> ParseOutput {
        let mut symbol_table = self.symbol_table;
        symbol_table.reset_scope();

        ParseOutput {
            statements,
            symbol_table,
            names: self.names,
            diagnostics: self.diagnostics,
        }
    }
}

/// Parses a stream of tokens into statements and a populated symbol table.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses all statements until EOF.
/// Syntax errors are returned as diagnostics next to whatever could be parsed.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> ParseOutput {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let statements = parse_statements(&mut parser, false);

    debug!(
        statements = statements.len(),
        scopes = parser.symbol_table.scope_count(),
        diagnostics = parser.diagnostics.len(),
        "parsed"
    );

    parser.finish(statements)
}
