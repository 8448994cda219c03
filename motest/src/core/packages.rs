//! Package table built from a package source listing.
//!
//! A listing is newline-delimited text where every line has the shape
//! `<flag> <alias> <source-root>` (the output of `mops sources`). The same
//! listing feeds two consumers: the compiler receives every token verbatim,
//! and the module resolver looks source roots up by alias.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use super::path::normalize;

/// Alias → source root mapping plus the flattened compiler arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageTable {
    roots: BTreeMap<String, PathBuf>,
    args: Vec<String>,
}

impl PackageTable {
    /// Parse a listing. Relative source roots are resolved against `base_dir`.
    ///
    /// Blank lines are ignored. A non-blank line with fewer than three tokens
    /// is rejected. When an alias repeats, the last line wins.
    pub fn parse(listing: &str, base_dir: &Path) -> Result<Self> {
        let mut table = Self::default();

        for (index, line) in listing.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            let [_, alias, root, ..] = tokens.as_slice() else {
                return Err(anyhow!(
                    "package listing line {}: expected `<flag> <alias> <path>`, got `{}`",
                    index + 1,
                    line.trim()
                ));
            };
            table
                .roots
                .insert((*alias).to_string(), normalize(&base_dir.join(root)));
            table.args.extend(tokens.iter().map(|token| token.to_string()));
        }

        Ok(table)
    }

    /// Source root for `alias`, or `None` when the alias is not tracked.
    pub fn root(&self, alias: &str) -> Option<&Path> {
        self.roots.get(alias).map(PathBuf::as_path)
    }

    /// Every listing token in order, ready to pass to the compiler.
    pub fn compiler_args(&self) -> &[String] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
