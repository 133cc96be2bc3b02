//! Architectural Enforcement Integration Tests
//!
//! Source scans that keep the workspace honest:
//! - The lookup core never depends on a UI framework
//! - Production code never parks a runtime thread with a sleep
//!
//! The helpers here are shared by the tests under `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Headless crate sources
pub const CORE_SRC: &str = "lookup/core/src";

/// Terminal surface sources
pub const TUI_SRC: &str = "tui/src";

/// Workspace root, two levels above this crate
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// Every `.rs` file under `dir` (relative to the workspace root)
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Read a file, treating unreadable files as empty
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

/// Code lines that ship in release builds, as (1-based line, code)
///
/// Stops at the first `#[cfg(test)]` and drops `//` comments.
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let content = "fn a() {}\n// note\nfn b() {} // trailing\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(content);
        assert_eq!(lines, vec![(1, "fn a() {}"), (3, "fn b() {} ")]);
    }

    #[test]
    fn test_workspace_root_holds_both_crates() {
        assert!(!rust_sources(CORE_SRC).is_empty());
        assert!(!rust_sources(TUI_SRC).is_empty());
    }
}
