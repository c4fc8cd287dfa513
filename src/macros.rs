//! Utility macros for the compiler.
//!
//! This module defines helper macros used throughout the front end:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed tokens
//! - `MK_ID!` - Declares a `u32` newtype used as an arena or table key
//!
//! These macros reduce boilerplate in the lexer and the symbol table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The optional token payload
/// * `$line` - The 1-based source line
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLiteral, Some(TokenValue::Int(42)), 3);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $line:expr) => {
        Token {
            kind: $kind,
            value: $value,
            line: $line,
        }
    };
}

/// Creates a default lexer handler for fixed punctuation and operators.
///
/// Generates a handler that pushes a payload-free token of the given kind on
/// the lexer's current line and advances past the literal text.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal source text (used for length calculation)
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new(r"^\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let line = lexer.line();
            lexer.push(MK_TOKEN!($kind, None, line));
            lexer.advance_n($value.len());
        }
    };
}

/// Declares a strongly typed `u32` identifier.
///
/// Used for symbol ids handed out by the parser and for scope indices into
/// the symbol table's arena.
#[macro_export]
macro_rules! MK_ID {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// Construct an identifier from a raw value.
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Retrieve the underlying integer value.
            pub const fn to_raw(self) -> u32 {
                self.0
            }

            /// The identifier as a `usize`, for indexing.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
