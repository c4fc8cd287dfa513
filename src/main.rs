use std::{fs::read_to_string, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use scriptc::{
    check_source, display_error, lexer::lexer::tokenize, symbols::SymbolId, CheckedUnit,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Front end for the scripting language: tokenize, parse and type check.
#[derive(Parser, Debug)]
#[command(name = "scriptc", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type check a source file and print its diagnostics
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Name used for the source in diagnostics (defaults to the file name)
        #[arg(long, value_name = "SOURCE_ID")]
        name: Option<String>,

        /// Print the parsed statements
        #[arg(long)]
        dump_ast: bool,

        /// Print every scope of the symbol table
        #[arg(long)]
        dump_symbols: bool,
    },
    /// Print the tokens of a source file
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            file,
            name,
            dump_ast,
            dump_symbols,
        } => check(file, name, dump_ast, dump_symbols),
        Command::Tokens { file } => tokens(file),
    }
}

fn read_source(file: &PathBuf) -> Result<String, ExitCode> {
    read_to_string(file).map_err(|error| {
        eprintln!("error: cannot read {}: {}", file.display(), error);
        ExitCode::from(2)
    })
}

fn source_name(file: &PathBuf) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn check(file: PathBuf, name: Option<String>, dump_ast: bool, dump_symbols: bool) -> ExitCode {
    let source = match read_source(&file) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let name = name.unwrap_or_else(|| source_name(&file));

    let unit = match check_source(&source, &name) {
        Ok(unit) => unit,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::from(3);
        }
    };

    if dump_ast {
        for stmt in unit.statements.iter() {
            println!("{:#?}", stmt);
        }
    }
    if dump_symbols {
        print_symbols(&unit);
    }

    for diagnostic in unit.diagnostics.iter() {
        eprintln!("{}\n", display_error(diagnostic, &source));
    }

    info!(diagnostics = unit.diagnostics.len(), file = %name, "checked");

    if unit.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_symbols(unit: &CheckedUnit) {
    for raw in 0..unit.names.len() as u32 {
        let symbol = SymbolId::from_raw(raw);
        if let Some(name) = unit.names.resolve(symbol) {
            println!("{:?} = {}", symbol, name);
        }
    }

    for scope in unit.symbol_table.scopes() {
        println!("{:#?}", scope);
    }
}

fn tokens(file: PathBuf) -> ExitCode {
    let source = match read_source(&file) {
        Ok(source) => source,
        Err(code) => return code,
    };

    let (tokens, diagnostics) = tokenize(&source, Some(source_name(&file)));
    for token in tokens.iter() {
        println!("{:>4}  {}", token.line, token);
    }
    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }

    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
