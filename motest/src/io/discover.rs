//! Test module discovery.
//!
//! Candidates live under one of the configured test directories directly
//! below the project root (`test/` or `tests/` by default), at any depth, and
//! are named `<name>.test.mo` or `<name>.Test.mo`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

static TEST_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+\.(test|Test)\.mo$").expect("valid test file regex"));

/// True when `file_name` follows the test-suffix naming convention.
pub fn is_test_file_name(file_name: &str) -> bool {
    TEST_FILE.is_match(file_name)
}

/// Find test modules under `root/<dir>` for each of `test_dirs`.
///
/// The build directory is skipped wherever it appears. Results are absolute
/// (joined onto `root`) and sorted.
pub fn discover_tests(root: &Path, test_dirs: &[String], build_dir: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for dir in test_dirs {
        let top = root.join(dir);
        if !top.is_dir() {
            debug!(dir = %top.display(), "test directory absent");
            continue;
        }

        let walker = WalkDir::new(&top)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_build_dir(entry, build_dir));
        for entry in walker {
            let entry = entry.with_context(|| format!("walk {}", top.display()))?;
            if entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(is_test_file_name)
            {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found.dedup();
    debug!(count = found.len(), "discovered test modules");
    Ok(found)
}

fn is_build_dir(entry: &DirEntry, build_dir: &str) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == build_dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TempProject, at};

    fn dirs() -> Vec<String> {
        vec!["test".to_string(), "tests".to_string()]
    }

    #[test]
    fn suffix_convention_is_case_sensitive() {
        assert!(is_test_file_name("List.test.mo"));
        assert!(is_test_file_name("List.Test.mo"));
        assert!(!is_test_file_name("List.TEST.mo"));
        assert!(!is_test_file_name("List.mo"));
        assert!(!is_test_file_name(".test.mo"));
        assert!(!is_test_file_name("List.test.mo.bak"));
    }

    #[test]
    fn finds_tests_in_both_directories_at_any_depth() {
        let project = TempProject::new().expect("project");
        project.write("test/a.test.mo", "", at(1)).expect("write");
        project.write("tests/nested/deep/b.Test.mo", "", at(1)).expect("write");
        project.write("tests/helpers.mo", "", at(1)).expect("write");
        project.write("src/c.test.mo", "", at(1)).expect("write");

        let found = discover_tests(project.path(), &dirs(), ".wasm").expect("discover");
        assert_eq!(
            found,
            vec![
                project.path().join("test/a.test.mo"),
                project.path().join("tests/nested/deep/b.Test.mo"),
            ]
        );
    }

    #[test]
    fn skips_build_directory() {
        let project = TempProject::new().expect("project");
        project.write("tests/a.test.mo", "", at(1)).expect("write");
        project.write("tests/.wasm/stale.test.mo", "", at(1)).expect("write");

        let found = discover_tests(project.path(), &dirs(), ".wasm").expect("discover");
        assert_eq!(found, vec![project.path().join("tests/a.test.mo")]);
    }

    #[test]
    fn empty_project_discovers_nothing() {
        let project = TempProject::new().expect("project");
        let found = discover_tests(project.path(), &dirs(), ".wasm").expect("discover");
        assert!(found.is_empty());
    }
}
