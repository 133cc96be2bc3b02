//! Integration Test: Core/UI Separation
//!
//! **Policy**: `bizlookup-core` stays headless. It must not depend on, import,
//! or mention a terminal UI crate; only the `tui` crate may.

use architectural_enforcement::{production_lines, read, rust_sources, workspace_root, CORE_SRC};

const UI_CRATES: [&str; 2] = ["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = read(&workspace_root().join("lookup/core/Cargo.toml"));
    assert!(!manifest.is_empty(), "core manifest not found");

    for krate in UI_CRATES {
        let declared = manifest
            .lines()
            .any(|line| line.trim_start().starts_with(krate));
        assert!(!declared, "lookup/core/Cargo.toml depends on {krate}");
    }
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_sources(CORE_SRC) {
        let content = read(&path);
        for (line, code) in production_lines(&content) {
            if UI_CRATES
                .iter()
                .any(|krate| code.contains(&format!("{krate}::")))
            {
                violations.push(format!("{}:{} - {}", path.display(), line, code.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI imports found in the core:\n  {}",
        violations.join("\n  ")
    );
}
