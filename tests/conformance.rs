use std::{env, fs, path::Path};

use serde::Deserialize;

use lgtm::{validate_module, Module};

// Each case file is a list of commands over JSON-described structural
// modules: either the module must validate, or it must fail with a message
// starting with `text`.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TestCmd {
    AssertValid {
        name: String,
        module: Module,
    },
    AssertInvalid {
        name: String,
        module: Module,
        text: String,
    },
}

#[derive(Deserialize)]
struct CaseFile {
    commands: Vec<TestCmd>,
}

fn run_case_file(path: &Path) -> (u32, u32) {
    let json_text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    let case_file: CaseFile = serde_json::from_str(&json_text)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e));

    let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
    let mut passes = 0u32;
    let mut failures = 0u32;

    for cmd in &case_file.commands {
        let result = match cmd {
            TestCmd::AssertValid { name, module } => match validate_module(module) {
                Ok(()) => Ok(()),
                Err(e) => Err(format!("{}: expected valid, got '{}'", name, e.message())),
            },
            TestCmd::AssertInvalid { name, module, text } => match validate_module(module) {
                Err(e) if e.message().starts_with(text.as_str()) => Ok(()),
                Err(e) => Err(format!(
                    "{}: message mismatch: expected '{}', got '{}'",
                    name,
                    text,
                    e.message()
                )),
                Ok(()) => Err(format!("{}: expected invalid: '{}'", name, text)),
            },
        };

        match result {
            Ok(()) => passes += 1,
            Err(e) => {
                eprintln!("[{}] {}", file_name, e);
                failures += 1;
            }
        }
    }

    (passes, failures)
}

#[test]
fn run_conformance_cases() {
    let filter = env::var("CASE_FILTER").ok();
    let case_dir = Path::new("tests/cases");

    let mut total_passes = 0u32;
    let mut total_failures = 0u32;

    let mut paths: Vec<_> = fs::read_dir(case_dir)
        .expect("failed to read tests/cases")
        .map(|entry| entry.expect("failed to read entry").path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    for path in paths {
        let stem = path.file_stem().unwrap().to_str().unwrap().to_owned();
        if let Some(ref f) = filter {
            if !stem.contains(f.as_str()) {
                continue;
            }
        }

        println!("Running {}", stem);
        let (passes, failures) = run_case_file(&path);
        println!("  {} passed, {} failed", passes, failures);
        total_passes += passes;
        total_failures += failures;
    }

    println!("\nTotal: {} passed, {} failed", total_passes, total_failures);
    assert!(total_passes > 0, "no conformance cases were run");
    if total_failures > 0 {
        panic!("{} conformance cases failed", total_failures);
    }
}
