//! conform CLI
//!
//! Checks and coerces JSON/YAML documents against declared record types.

use std::path::Path;

use conform_check::{ConformConfig, OpaquePolicy};
use conformc::{commands, init_tracing, CliError};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "check" | "coerce" => {
            let (config, positional) = parse_options(&args[2..]);
            let [decls, target, data] = positional.as_slice() else {
                eprintln!("Usage: conform {command} <decls.json> <Type> <data.(json|yaml|yml)> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --reject-opaque   Treat unconstrained type variables as mismatches");
                eprintln!("  --enum-values     Map plain values to the enum member with that value");
                std::process::exit(2);
            };
            let (decls, data) = (Path::new(decls), Path::new(data));
            let result = if command == "check" {
                commands::check(decls, target, data, &config)
            } else {
                commands::coerce(decls, target, data, &config)
            };
            finish(result);
        }
        "types" => {
            let Some(decls) = args.get(2) else {
                eprintln!("Usage: conform types <decls.json>");
                std::process::exit(2);
            };
            finish(commands::types(Path::new(decls)));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("conform {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    }
}

/// Split flags from positional arguments.
fn parse_options(args: &[String]) -> (ConformConfig, Vec<&str>) {
    let mut config = ConformConfig::new();
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--reject-opaque" => config = config.with_opaque(OpaquePolicy::Reject),
            "--enum-values" => config = config.with_enums_by_value(true),
            flag if flag.starts_with("--") => {
                eprintln!("warning: ignoring unknown option {flag}");
            }
            other => positional.push(other),
        }
    }
    (config, positional)
}

fn finish(result: Result<String, CliError>) {
    match result {
        Ok(out) => println!("{out}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn print_usage() {
    println!("conform: structural checking and coercion against declared types");
    println!();
    println!("Usage: conform <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <decls.json> <Type> <data>    Coerce a document and check the result");
    println!("  coerce <decls.json> <Type> <data>   Coerce a document and print it as JSON");
    println!("  types <decls.json>                  List declared types");
    println!("  help                                Show this help message");
    println!("  version                             Show version information");
    println!();
    println!("Options:");
    println!("  --reject-opaque   Treat unconstrained type variables as mismatches");
    println!("  --enum-values     Map plain values to the enum member with that value");
    println!();
    println!("Data documents may be JSON (.json) or YAML (.yaml, .yml).");
    println!("Set RUST_LOG (e.g. RUST_LOG=conform_check=debug) for tracing output.");
}
