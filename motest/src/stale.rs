//! Transitive staleness checks over the module import graph.
//!
//! An artifact is fresh iff neither its source module nor any module reachable
//! from it through imports was modified after the artifact was written. The
//! artifact's timestamp is the single reference for the whole walk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::core::imports::extract_imports;
use crate::io::mtime::MtimeCache;
use crate::io::resolver::ModuleResolver;

/// Depth-first staleness walk backed by a shared modification-time cache.
#[derive(Debug, Clone, Copy)]
pub struct StalenessOracle<'a> {
    resolver: ModuleResolver<'a>,
    mtimes: &'a MtimeCache,
}

impl<'a> StalenessOracle<'a> {
    pub fn new(resolver: ModuleResolver<'a>, mtimes: &'a MtimeCache) -> Self {
        Self { resolver, mtimes }
    }

    /// Start a fresh query for `module` against `reference`.
    pub fn check(&self, module: &Path, reference: SystemTime) -> Result<bool> {
        let mut visited = HashSet::new();
        let stale = self.is_stale(module, reference, &mut visited)?;
        debug!(
            module = %module.display(),
            stale,
            inspected = visited.len(),
            "staleness query finished"
        );
        Ok(stale)
    }

    /// True if `module` or anything it transitively imports is newer than `reference`.
    ///
    /// `visited` belongs to a single query. Each resolved import is inserted
    /// before it is walked, so shared dependencies are inspected once and
    /// import cycles terminate. The walk stops at the first newer module.
    pub fn is_stale(
        &self,
        module: &Path,
        reference: SystemTime,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<bool> {
        if self.mtimes.is_newer_than(module, reference)? {
            trace!(module = %module.display(), "module newer than artifact");
            return Ok(true);
        }

        let source = fs::read_to_string(module)
            .with_context(|| format!("read module {}", module.display()))?;

        for specifier in extract_imports(&source) {
            let Some(dependency) = self.resolver.resolve(&specifier, module) else {
                continue;
            };
            if !visited.insert(dependency.clone()) {
                continue;
            }
            if self.is_stale(&dependency, reference, visited)? {
                trace!(
                    module = %module.display(),
                    via = %specifier,
                    "stale through import"
                );
                return Ok(true);
            }
        }

        Ok(false)
    }
}
