//! Helpers for deterministic module and artifact paths.

use std::path::{Component, Path, PathBuf};

/// Source module extension.
pub const SOURCE_EXTENSION: &str = "mo";
/// Compiled artifact extension.
pub const ARTIFACT_EXTENSION: &str = "wasm";
/// Index file probed when an import names a directory.
pub const DIRECTORY_INDEX: &str = "lib.mo";

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching how absolute paths resolve.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Derive the artifact path for `module` inside `root`.
///
/// The build directory is inserted directly below `root` and the source
/// extension is swapped for the artifact extension, so
/// `<root>/tests/a.test.mo` maps to `<root>/<build_dir>/tests/a.test.wasm`.
/// Keeping the full relative path keeps the mapping collision-free.
pub fn artifact_path(root: &Path, build_dir: &str, module: &Path) -> PathBuf {
    let relative = module.strip_prefix(root).unwrap_or(module);
    root.join(build_dir)
        .join(relative)
        .with_extension(ARTIFACT_EXTENSION)
}

/// Append the source extension to an extension-less base path.
pub fn with_source_extension(base: &Path) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(".");
    raw.push(SOURCE_EXTENSION);
    PathBuf::from(raw)
}

/// Render `path` relative to `root` for display, falling back to the full path.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
