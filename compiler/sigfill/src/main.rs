//! Sigfill CLI
//!
//! Fills type suggestions from a runtime type collector into Python headers.

mod commands;

use commands::{annotate_file, dump_tokens, AnnotateOptions};

fn main() {
    sigfill::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "annotate" => {
            if args.len() < 4 {
                eprintln!("Usage: sigfill annotate <file.py> <suggestions.json> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --replace               Replace headers instead of inserting above them");
                eprintln!("  --comment-prefix=<p>    Prefix for error comments (default: '# types: ')");
                eprintln!("  --apply                 Print the whole file with suggestions applied");
                std::process::exit(1);
            }

            let mut options = AnnotateOptions::default();
            for arg in args.iter().skip(4) {
                if arg == "--replace" {
                    options.config.replace = true;
                } else if arg == "--apply" {
                    options.apply = true;
                } else if let Some(prefix) = arg.strip_prefix("--comment-prefix=") {
                    options.config.comment_prefix = prefix.to_string();
                } else {
                    eprintln!("error: unknown option '{arg}'");
                    std::process::exit(1);
                }
            }

            annotate_file(&args[2], &args[3], &options);
        }
        "tokens" => {
            if args.len() < 4 {
                eprintln!("Usage: sigfill tokens <file.py> <line>");
                std::process::exit(1);
            }
            let Ok(line) = args[3].parse::<usize>() else {
                eprintln!("error: '{}' is not a line number", args[3]);
                std::process::exit(1);
            };
            dump_tokens(&args[2], line);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("sigfill {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Python signature annotation from collected types");
    println!();
    println!("Usage: sigfill <command> [options]");
    println!();
    println!("Commands:");
    println!("  annotate <file.py> <suggestions.json>   Turn suggestions into header edits");
    println!("  tokens <file.py> <line>                 Show the tokens of a function header");
    println!("  help                                    Show this help message");
    println!("  version                                 Show version information");
    println!();
    println!("Annotate options:");
    println!("  --replace               Replace headers instead of inserting above them");
    println!("  --comment-prefix=<p>    Prefix for error comments (default: '# types: ')");
    println!("  --apply                 Print the whole file with suggestions applied");
    println!();
    println!("Line numbers are 1-based. Files are never modified.");
    println!("Set RUST_LOG=sigfill=debug to trace what happens.");
}
