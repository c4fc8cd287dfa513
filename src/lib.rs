#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Stmt,
    errors::errors::{Diagnostic, ErrorTip, InternalError},
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::{interner::SymbolInterner, symbol_table::SymbolTable},
    type_checker::type_checker::TypeChecker,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A 1-based source line and the identifier of the source it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

/// Everything the front end produced for one source text.
#[derive(Debug)]
pub struct CheckedUnit {
    pub statements: Vec<Stmt>,
    pub symbol_table: SymbolTable,
    pub names: SymbolInterner,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckedUnit {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs the lexer, the parser and the type checker over `source`.
///
/// Diagnostics of all three stages are returned in stage order. Only a fault
/// in the compiler itself produces an `Err`.
#[tracing::instrument(skip_all, fields(file = file, source_len = source.len()))]
pub fn check_source(source: &str, file: &str) -> Result<CheckedUnit, InternalError> {
    let file = Rc::new(file.to_string());

    let (tokens, mut diagnostics) = tokenize(source, Some(file.to_string()));
    let output = parse(tokens, Rc::clone(&file));
    diagnostics.extend(output.diagnostics);

    let mut symbol_table = output.symbol_table;
    let mut checker = TypeChecker::new(&mut symbol_table, file);
    checker.check_all(&output.statements)?;
    diagnostics.extend(checker.into_diagnostics());

    Ok(CheckedUnit {
        statements: output.statements,
        symbol_table,
        names: output.names,
        diagnostics,
    })
}

/// Returns the text of the 1-based `line` of `source`, without its newline.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches('\r'))
}

/// Renders a diagnostic with the offending source line underneath it.
///
/// ```text
/// Error: TypeMatchError (Expected type `int`, received `str`)
/// -> final.sc:20
///    |
/// 20 | let a: int = 'x'
///    | ^^^^^^^^^^^^^^^^
/// ```
pub fn display_error(error: &Diagnostic, source: &str) -> String {
    let line = error.line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    rendered.push_str(&format!("-> {}:{}\n", error.file(), line));
    rendered.push_str(&format!("{:>padding$}\n", "|"));

    match get_line_at_position(source, line) {
        Some(line_text) if !line_text.trim().is_empty() => {
            let trimmed = line_text.trim();
            rendered.push_str(&format!("{} | {}\n", line_string, trimmed));
            let arrows = trimmed.chars().count();
            rendered.push_str(&format!("{:>padding$} {}", "|", "^".repeat(arrows)));
        }
        _ => {
            rendered.push_str(&format!("{} | {}", line_string, error.message()));
        }
    }

    rendered
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nlet a = 1\n\n    Testing { }\n";

        assert_eq!(super::get_line_at_position(source, 1), Some("Hello, world!"));
        assert_eq!(super::get_line_at_position(source, 3), Some(""));
        assert_eq!(
            super::get_line_at_position(source, 4),
            Some("    Testing { }")
        );
        assert_eq!(super::get_line_at_position(source, 0), None);
        assert_eq!(super::get_line_at_position(source, 9), None);
    }

    #[test]
    fn test_display_error_layout() {
        let source = "let a = 1\n  let b: int = 'x'\n";
        let unit = super::check_source(source, "main.sc").unwrap();
        assert_eq!(unit.diagnostics.len(), 1);

        let rendered = super::display_error(&unit.diagnostics[0], source);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines[0],
            "Error: TypeMatchError (Expected type `int`, received `str`)"
        );
        assert_eq!(lines[1], "-> main.sc:2");
        assert_eq!(lines[3], "2 | let b: int = 'x'");
        assert!(lines[4].ends_with("^^^^^^^^^^^^^^^^"));
    }
}
