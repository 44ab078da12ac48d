use clap::Parser;
use std::fs;
use std::path::PathBuf;

use lgtm::{validate_module, Module};

#[derive(Parser, Debug)]
#[command(name = "lgtm-check")]
#[command(about = "Validate JSON-described WebAssembly modules")]
#[command(long_about = "
lgtm-check - structural WebAssembly module validator

Reads one or more JSON module descriptions (the same format the conformance
harness uses) and reports whether each module is well-formed under its
feature spec. Nothing is executed; this is validation only.

Examples:
  # Validate a single module description
  lgtm-check module.json

  # Validate several, printing per-module details
  lgtm-check a.json b.json --verbose

  # Quiet mode (only show errors)
  lgtm-check module.json --quiet
")]
struct Args {
    /// Path(s) to JSON module description file(s)
    module_files: Vec<PathBuf>,

    /// Show verbose validation details
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn check_file(path: &PathBuf, verbose: bool, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Validating: {}", path.display());
    }

    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let module: Module = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    if verbose {
        println!("  Types: {}", module.types.len());
        println!("  Functions: {}", module.functions.len());
        println!("  Imports: {}", module.imports.len());
        println!("  Exports: {}", module.exports.len());
    }

    match validate_module(&module) {
        Ok(()) => {
            if !quiet {
                println!("{}: ok", path.display());
            }
            Ok(())
        }
        Err(e) => Err(format!("{}: {}", path.display(), e).into()),
    }
}

fn main() {
    let args = Args::parse();

    if args.module_files.is_empty() {
        eprintln!("No module files given");
        std::process::exit(2);
    }

    let mut failures = 0usize;
    for path in &args.module_files {
        if let Err(e) = check_file(path, args.verbose, args.quiet) {
            eprintln!("{}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("{} of {} modules failed validation", failures, args.module_files.len());
        std::process::exit(1);
    }
}
