//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the bridge MUST NOT call sleep methods.
//! Waiting is expressed through the `Timer` trait: the controller schedules a
//! deadline and returns, and the host loop delivers it later.
//!
//! **Exception**: `bridge/core/src/timer.rs` implements `TokioTimer` on top of
//! `tokio::time::sleep`, one spawned task per deadline. Blocking
//! `std::thread::sleep` is forbidden everywhere.

use std::path::Path;

use architectural_enforcement::{scan, Violation};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }

        eprintln!("\n✅ ACCEPTABLE sleep uses:");
        eprintln!("  - tokio::time::sleep inside the TokioTimer deadline task");
        eprintln!("  - Test code (#[cfg(test)] modules, tests/ directories)");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep to wait out the debounce window (schedule a deadline)");
        eprintln!("  - Sleep as poor man's synchronization");
        eprintln!("  - std::thread::sleep anywhere");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<Violation> {
    let mut violations = scan("bridge/core/src", |path, line| {
        is_sleep_call(line) && !is_timer_task(path, line)
    });
    violations.extend(scan("bridge/cli/src", |_, line| is_sleep_call(line)));
    violations
}

fn is_sleep_call(line: &str) -> bool {
    line.contains("::sleep(") || line.contains(".sleep(")
}

/// The one sanctioned sleep: the deadline task of `TokioTimer`
fn is_timer_task(path: &Path, line: &str) -> bool {
    path.ends_with("bridge/core/src/timer.rs") && line.contains("tokio::time::sleep(")
}

#[test]
fn test_sleep_detection() {
    assert!(is_sleep_call("    std::thread::sleep(Duration::from_millis(10));"));
    assert!(is_sleep_call("    tokio::time::sleep(delay).await;"));
    assert!(!is_sleep_call("    let asleep = true;"));
}

#[test]
fn test_timer_task_exception_is_narrow() {
    let timer = Path::new("/w/bridge/core/src/timer.rs");
    let lifecycle = Path::new("/w/bridge/core/src/lifecycle.rs");

    assert!(is_timer_task(timer, "tokio::time::sleep(delay).await;"));
    assert!(!is_timer_task(timer, "std::thread::sleep(delay);"));
    assert!(!is_timer_task(lifecycle, "tokio::time::sleep(delay).await;"));
}
