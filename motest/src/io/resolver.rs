//! Import specifier resolution to source file paths.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::packages::PackageTable;
use crate::core::path::{DIRECTORY_INDEX, normalize, with_source_extension};
use crate::core::specifier::Specifier;

/// Turns raw import specifiers into absolute source paths.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    packages: &'a PackageTable,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(packages: &'a PackageTable) -> Self {
        Self { packages }
    }

    /// Resolve `raw` as imported from `importer`.
    ///
    /// Returns `None` when the import is not a tracked source dependency: an
    /// alias missing from the package table, or an actor reference such as
    /// `canister:ledger`. The returned path is not guaranteed to exist.
    pub fn resolve(&self, raw: &str, importer: &Path) -> Option<PathBuf> {
        let base = match Specifier::parse(raw) {
            Specifier::Package { alias, subpath } => {
                let Some(root) = self.packages.root(alias) else {
                    debug!(alias, importer = %importer.display(), "untracked package alias");
                    return None;
                };
                root.join(subpath)
            }
            Specifier::External { scheme } => {
                debug!(scheme, specifier = raw, "skipping actor import");
                return None;
            }
            Specifier::Relative(relative) => importer
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(relative),
        };

        Some(probe_module(&normalize(&base)))
    }
}

/// `<base>.mo` when it exists, otherwise the directory index `<base>/lib.mo`.
fn probe_module(base: &Path) -> PathBuf {
    let file = with_source_extension(base);
    if file.is_file() {
        file
    } else {
        base.join(DIRECTORY_INDEX)
    }
}
