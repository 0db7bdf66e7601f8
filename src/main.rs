//! RPAL front-end CLI
//!
//! Command-line interface for tokenizing and parsing programs.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use tracing_subscriber::EnvFilter;

use rpal_syntax::lexer::{read_tokens, write_tokens};
use rpal_syntax::{parse, render, tokenize, Diagnostic, RpalError, VERSION};

const PROMPT: &str = "rpal> ";

/// Options collected from the command line
#[derive(Debug, Default)]
struct Options {
    show_tokens: bool,
    dump_tokens: bool,
    with_keywords: bool,
    from_tokens: bool,
    output: Option<String>,
    filename: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rpal_syntax=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_help();
            return;
        }
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            process::exit(1);
        }
    };

    let Some(filename) = options.filename.clone() else {
        println!("RPAL v{} - syntax tree explorer", VERSION);
        println!("Type 'exit' to quit\n");
        repl();
        return;
    };

    if let Err(e) = run_file(&filename, &options) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Returns `Ok(None)` when help was requested
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tokens" | "-t" => options.show_tokens = true,
            "--lex" | "-l" => options.dump_tokens = true,
            "--ast" | "-a" => options.with_keywords = true,
            "--from-tokens" => options.from_tokens = true,
            "--output" | "-o" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("Missing path after '{}'", arg))?;
                options.output = Some(path.clone());
            }
            "--help" | "-h" => return Ok(None),
            _ if arg.starts_with('-') => return Err(format!("Unknown flag: {}", arg)),
            _ => options.filename = Some(arg.clone()),
        }
    }

    Ok(Some(options))
}

fn print_usage() {
    eprintln!("Usage: rpal [OPTIONS] [file]");
    eprintln!("       rpal --help");
}

fn print_help() {
    println!("RPAL v{} - tokenizer and parser", VERSION);
    println!();
    println!("USAGE:");
    println!("    rpal [OPTIONS] [file]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --tokens        Show the token table and stop");
    println!("    -l, --lex           Print the token dump and stop");
    println!("    -a, --ast           Include structural keywords in the tree");
    println!("        --from-tokens   Read the input file as a token dump");
    println!("    -o, --output PATH   Write the tree to PATH");
    println!("    -h, --help          Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG            Log filter, e.g. rpal_syntax=debug");
    println!();
    println!("EXAMPLES:");
    println!("    rpal -a input.rpal                  Print the syntax tree");
    println!("    rpal --lex input.rpal > tokens.txt  Save the token dump");
    println!("    rpal --from-tokens -a tokens.txt    Parse a saved token dump");
    println!("    rpal                                Start interactive REPL");
}

/// Tokenize and/or parse a file according to the options
fn run_file(filename: &str, options: &Options) -> Result<(), String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let tokens = if options.from_tokens {
        read_tokens(&source, Some(filename))
    } else {
        tokenize(&source, Some(filename))
    }
    .map_err(|e| report(e, &source))?;

    if options.dump_tokens {
        print!("{}", write_tokens(&tokens));
        return Ok(());
    }

    if options.show_tokens {
        println!("Tokens for '{}':", filename);
        println!("{}", "=".repeat(60));
        for (i, token) in tokens.iter().enumerate() {
            println!("{:4}: {:14} | {:?}", i, token.kind.to_string(), token.text);
        }
        println!("{}", "=".repeat(60));
        println!("Total tokens: {}", tokens.len());
        return Ok(());
    }

    let ast = parse(tokens).map_err(|e| report(e, &source))?;
    for token in &ast.skipped {
        eprintln!("warning: skipped {} at {}", token, token.location);
    }

    let tree = render(&ast.root, options.with_keywords);
    match &options.output {
        Some(path) => {
            fs::write(path, &tree).map_err(|e| format!("Failed to write file '{}': {}", path, e))?;
            println!("Syntax tree has been stored in {}", path);
        }
        None => print!("{}", tree),
    }

    Ok(())
}

fn report(error: RpalError, source: &str) -> String {
    Diagnostic::with_source(error, source).to_string()
}

/// Start an interactive REPL (Read-Eval-Print Loop)
fn repl() {
    loop {
        print!("{}", PROMPT);
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let input = input.trim();

                if input == "exit" || input == "quit" {
                    break;
                }

                if input.is_empty() {
                    continue;
                }

                match tokenize(input, Some("<repl>")).and_then(parse) {
                    Ok(ast) => {
                        for token in &ast.skipped {
                            eprintln!("warning: skipped {}", token);
                        }
                        print!("{}", ast.root);
                    }
                    Err(e) => eprint!("{}", report(e, input)),
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("\nGoodbye!");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_flags() {
        let options = parse_args(&args(&["-a", "--from-tokens", "-o", "tree.txt", "tokens.txt"]))
            .unwrap()
            .unwrap();
        assert!(options.with_keywords);
        assert!(options.from_tokens);
        assert_eq!(options.output.as_deref(), Some("tree.txt"));
        assert_eq!(options.filename.as_deref(), Some("tokens.txt"));
    }

    #[test]
    fn test_parse_args_help_and_errors() {
        assert!(parse_args(&args(&["--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["-o"])).is_err());
    }

    #[test]
    fn test_prompt() {
        assert_eq!(PROMPT, "rpal> ");
    }
}
