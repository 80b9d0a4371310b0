//! Hygiene: source-level standards for the editor library, checked at test time.
//!
//! Each antipattern has a budget of zero in production code (`src/`, excluding
//! `*_test.rs`). Output to stdout is reserved for the CLI binary, and every
//! sibling test file must be wired into its module.

use std::fs;
use std::path::{Path, PathBuf};

struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    fn is_test(&self) -> bool {
        self.path.to_string_lossy().ends_with("_test.rs")
    }

    fn file_name(&self) -> String {
        self.path.file_name().unwrap_or_default().to_string_lossy().into_owned()
    }
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

fn all_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    files
}

fn production_files() -> Vec<SourceFile> {
    all_files().into_iter().filter(|f| !f.is_test()).collect()
}

/// Lines containing `pattern`, as `path:line` strings.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, _)| format!("  {}:{}", file.path.display(), n + 1))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn assert_absent(pattern: &str, why: &str) {
    let found = hits(&production_files(), pattern);
    assert!(found.is_empty(), "`{pattern}` is not allowed in library code ({why}):\n{}", found.join("\n"));
}

#[test]
fn sources_were_found() {
    assert!(production_files().iter().any(|f| f.file_name() == "lib.rs"));
}

// --- Panics ---

#[test]
fn no_unwrap() {
    assert_absent(".unwrap()", "propagate the error instead");
}

#[test]
fn no_expect() {
    assert_absent(".expect(", "propagate the error instead");
}

#[test]
fn no_panic_macros() {
    for pattern in ["panic!(", "unreachable!(", "todo!(", "unimplemented!("] {
        assert_absent(pattern, "the session must survive every failure");
    }
}

// --- Silent loss ---

#[test]
fn no_silent_discard() {
    assert_absent("let _ =", "inspect or log the value");
}

#[test]
fn no_dot_ok() {
    assert_absent(".ok()", "inspect or log the error");
}

// --- Structure ---

#[test]
fn no_allow_dead_code() {
    assert_absent("#[allow(dead_code)]", "delete unused code");
}

#[test]
fn stdout_only_in_binary() {
    let library: Vec<SourceFile> = production_files().into_iter().filter(|f| f.file_name() != "main.rs").collect();
    for pattern in ["println!(", "print!(", "dbg!("] {
        let found = hits(&library, pattern);
        assert!(found.is_empty(), "`{pattern}` in library code; use tracing:\n{}", found.join("\n"));
    }
}

#[test]
fn every_test_file_is_wired_in() {
    let files = all_files();
    for test in files.iter().filter(|f| f.is_test()) {
        let name = test.file_name();
        let attr = format!("#[path = \"{name}\"]");
        let module = name.trim_end_matches("_test.rs").to_string() + ".rs";
        let owner = files.iter().find(|f| f.file_name() == module);
        assert!(
            owner.is_some_and(|f| f.content.contains(&attr)),
            "{name} is not included by {module} via `#[cfg(test)] {attr}`"
        );
    }
}
