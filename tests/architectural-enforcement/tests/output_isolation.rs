//! Integration Test: Output Stream Isolation
//!
//! **Policy**: The core library never writes to the process's standard
//! streams directly. Escape sequences reach stdout only through `OscWriter`,
//! which serialises each frame and writes it whole under a lock; diagnostics
//! go through `tracing`.
//!
//! **Exception**: `bridge/core/src/protocol/writer.rs` owns `io::stdout()`.

use std::path::Path;

use architectural_enforcement::{scan, Violation};

#[test]
fn test_core_does_not_touch_standard_streams() {
    let violations = find_output_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Direct terminal output found in the core library!\n");

        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }

        eprintln!("\n✅ REQUIRED:");
        eprintln!("  - Frames: OscWriter::send (one write_all + flush per frame)");
        eprintln!("  - Diagnostics: tracing macros (the binary routes them to stderr)");

        panic!(
            "\nFound {} output violation(s) in the core library.\nFix these before merging!",
            violations.len()
        );
    }
}

fn find_output_violations() -> Vec<Violation> {
    scan("bridge/core/src", |path, line| {
        is_direct_output(line) && !is_frame_writer(path)
    })
}

fn is_direct_output(line: &str) -> bool {
    ["print!(", "println!(", "eprint!(", "eprintln!(", "stdout()", "stderr()", "dbg!("]
        .iter()
        .any(|needle| line.contains(needle))
}

fn is_frame_writer(path: &Path) -> bool {
    path.ends_with("bridge/core/src/protocol/writer.rs")
}

#[test]
fn test_output_detection() {
    assert!(is_direct_output("    println!(\"{}\", frame);"));
    assert!(is_direct_output("    let mut out = std::io::stdout();"));
    assert!(is_direct_output("    dbg!(&state);"));
    assert!(!is_direct_output("    writer.send(&frame)?;"));
}
