//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code waits on I/O, channels or timers, never on a
//! blocking sleep.
//! **Exceptions**: the frame interval in the TUI loop, the notice dismiss
//! timer, and test code.

use std::path::Path;

use architectural_enforcement::{production_lines, read, rust_sources, CORE_SRC, TUI_SRC};

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();
    for dir in [CORE_SRC, TUI_SRC] {
        for path in rust_sources(dir) {
            check_file(&path, &read(&path), &mut violations);
        }
    }

    assert!(
        violations.is_empty(),
        "Found {} sleep violation(s) in production code:\n  {}",
        violations.len(),
        violations.join("\n  ")
    );
}

fn check_file(path: &Path, content: &str, violations: &mut Vec<String>) {
    let lines = production_lines(content);
    for (pos, (line, code)) in lines.iter().enumerate() {
        if code.contains("thread::sleep(") {
            violations.push(format!("{}:{} - blocking {}", path.display(), line, code.trim()));
            continue;
        }
        if code.contains("::sleep(") && !is_allowed_async_sleep(&lines, pos) {
            violations.push(format!("{}:{} - {}", path.display(), line, code.trim()));
        }
    }
}

/// Async sleeps are fine for frame pacing and timers
fn is_allowed_async_sleep(lines: &[(usize, &str)], pos: usize) -> bool {
    if !lines[pos].1.contains("tokio::time::sleep(") {
        return false;
    }
    let start = pos.saturating_sub(10);
    let end = (pos + 5).min(lines.len());
    lines[start..end].iter().any(|(_, code)| {
        let code = code.to_lowercase();
        code.contains("frame") || code.contains("timer") || code.contains("on_expire")
    })
}

#[test]
fn test_detects_blocking_sleep() {
    let content = "fn poll() {\n    std::thread::sleep(Duration::from_millis(10));\n}\n";
    let mut violations = Vec::new();
    check_file(Path::new("poll.rs"), content, &mut violations);
    assert_eq!(violations.len(), 1);
}

#[test]
fn test_allows_frame_interval() {
    let content = "loop {\n    select! {\n        () = tokio::time::sleep(FRAME_INTERVAL) => {}\n    }\n}\n";
    let mut violations = Vec::new();
    check_file(Path::new("app.rs"), content, &mut violations);
    assert!(violations.is_empty());
}

#[test]
fn test_flags_polling_sleep() {
    let content = "loop {\n    if ready() { break; }\n    tokio::time::sleep(Duration::from_millis(5)).await;\n}\n";
    let mut violations = Vec::new();
    check_file(Path::new("poll.rs"), content, &mut violations);
    assert_eq!(violations.len(), 1);
}

#[test]
fn test_ignores_test_module() {
    let content = "fn f() {}\n#[cfg(test)]\nmod tests {\n    fn t() { std::thread::sleep(D); }\n}\n";
    let mut violations = Vec::new();
    check_file(Path::new("lib.rs"), content, &mut violations);
    assert!(violations.is_empty());
}
