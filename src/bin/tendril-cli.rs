//! Ad-hoc pattern compilation and matching against a JSON file from the
//! command line, feature-gated behind `cli` (spec `SPEC_FULL.md` §2 "CLI /
//! fixture tooling"), in the same spirit as the teacher's optional `cli`
//! feature.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tendril::engine::MatchOptions;
use tendril::error::CompileError;

#[derive(Parser)]
#[command(name = "tendril-cli")]
#[command(about = "Compile and run Tendril patterns against JSON input", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a pattern and print its AST, without matching anything.
    Ast {
        /// Pattern source, or a path to a file containing it with --file.
        pattern: String,
        #[arg(long)]
        file: bool,
    },
    /// Compile a pattern and run an anchored match against a JSON file.
    Match {
        /// Pattern source, or a path to a file containing it with --pattern-file.
        pattern: String,
        /// Path to the JSON input file.
        input: PathBuf,
        #[arg(long)]
        pattern_file: bool,
        /// Stop after the first solution.
        #[arg(long)]
        first: bool,
    },
    /// Compile a pattern and scan a JSON file for matches at any subtree.
    Scan {
        pattern: String,
        input: PathBuf,
        #[arg(long)]
        pattern_file: bool,
        #[arg(long)]
        first: bool,
    },
}

fn main() -> ExitCode {
    env_logger_init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Ast { pattern, file } => cmd_ast(&resolve_source(&pattern, file)),
        Command::Match {
            pattern,
            input,
            pattern_file,
            first,
        } => cmd_match(&resolve_source(&pattern, pattern_file), &input, first),
        Command::Scan {
            pattern,
            input,
            pattern_file,
            first,
        } => cmd_scan(&resolve_source(&pattern, pattern_file), &input, first),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn env_logger_init() {
    // `RUST_LOG=tendril=trace` surfaces the parser/engine hook traces
    // (spec §4.7) through the standard `log` facade.
    let _ = env_logger::try_init();
}

fn resolve_source(arg: &str, is_file: bool) -> String {
    if is_file {
        fs::read_to_string(arg).unwrap_or_else(|e| {
            eprintln!("error reading pattern file {arg}: {e}");
            std::process::exit(1);
        })
    } else {
        arg.to_string()
    }
}

fn read_input(path: &PathBuf) -> Result<serde_json::Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parsing {} as JSON: {e}", path.display()))
}

fn describe_compile_error(source: &str, err: CompileError) -> String {
    match err {
        CompileError::Syntax(e) => format!("syntax error at {}: {}\n  near: {}", e.position, e.message, e.token_window),
        CompileError::Semantic(e) => format!("semantic error in {source:?}: {e}"),
    }
}

fn cmd_ast(source: &str) -> Result<(), String> {
    let compiled = tendril::parser::parse(source).map_err(|e| describe_compile_error(source, e))?;
    compiled.ast.print().map_err(|e| format!("printing AST: {e}"))
}

fn cmd_match(source: &str, input: &PathBuf, first: bool) -> Result<(), String> {
    let pattern = tendril::compile(source).map_err(|e| describe_compile_error(source, e))?;
    let value = read_input(input)?;
    let opts = MatchOptions::default();
    if first {
        match pattern.first_match(&value, &opts).map_err(|e| e.to_string())? {
            Some(solution) => print_solution(&solution),
            None => println!("no match"),
        }
        return Ok(());
    }
    let outcome = pattern.match_value(&value, &opts).map_err(|e| e.to_string())?;
    for solution in &outcome.solutions {
        print_solution(solution);
    }
    if outcome.limit_exceeded {
        eprintln!("warning: step budget exceeded, results are partial");
    }
    println!("{} solution(s)", outcome.solutions.len());
    Ok(())
}

fn cmd_scan(source: &str, input: &PathBuf, first: bool) -> Result<(), String> {
    let pattern = tendril::compile(source).map_err(|e| describe_compile_error(source, e))?;
    let value = read_input(input)?;
    let opts = MatchOptions::default();
    if first {
        match pattern.first_scan(&value, &opts) {
            Some(hit) => {
                println!("at {}:", hit.path);
                print_solution(&hit.solution);
            }
            None => println!("no match"),
        }
        return Ok(());
    }
    let outcome = pattern.scan(&value, &opts);
    for hit in &outcome.hits {
        println!("at {}:", hit.path);
        print_solution(&hit.solution);
    }
    if outcome.limit_exceeded {
        eprintln!("warning: step budget exceeded, results are partial");
    }
    println!("{} hit(s)", outcome.hits.len());
    Ok(())
}

fn print_solution(solution: &tendril::Solution) {
    for (name, value) in solution.bindings() {
        println!("  {name} = {value}");
    }
    for (name, value) in solution.buckets() {
        println!("  bucket {name} = {value}");
    }
}
