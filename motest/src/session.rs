//! Process-scoped state shared by every orchestration step.
//!
//! A [`Session`] is built once at start-up and borrowed by the staleness
//! oracle, the build orchestrator and the test runner. The package table and
//! configuration are read-only afterwards; the modification-time cache is the
//! only interior-mutable part and is safe to share across build threads.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::packages::PackageTable;
use crate::core::path::artifact_path;
use crate::io::compiler::MocCompiler;
use crate::io::config::{CONFIG_FILE, MotestConfig, load_config};
use crate::io::discover::discover_tests;
use crate::io::mtime::MtimeCache;
use crate::io::packages::{PackageSource, load_packages};
use crate::io::resolver::ModuleResolver;
use crate::io::runtime::WasmtimeRuntime;
use crate::stale::StalenessOracle;

/// Overrides for [`Session::open`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Config file to load instead of `<root>/motest.toml`.
    pub config_path: Option<PathBuf>,
    /// Read the package listing from this file instead of running `package_sources`.
    pub packages_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Session {
    pub root: PathBuf,
    pub config: MotestConfig,
    pub packages: PackageTable,
    pub mtimes: MtimeCache,
}

impl Session {
    /// Assemble a session from already-loaded parts. `root` must be absolute.
    pub fn new(root: impl Into<PathBuf>, config: MotestConfig, packages: PackageTable) -> Self {
        Self {
            root: root.into(),
            config,
            packages,
            mtimes: MtimeCache::new(),
        }
    }

    /// Load config and the package table for the project at `root`.
    pub fn open(root: &Path, options: &SessionOptions) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("resolve project dir {}", root.display()))?;
        let config_path = options
            .config_path
            .clone()
            .unwrap_or_else(|| root.join(CONFIG_FILE));
        let config = load_config(&config_path)?;
        debug!(root = %root.display(), config = %config_path.display(), "opening session");

        let source = match &options.packages_file {
            Some(path) => PackageSource::File(path),
            None => PackageSource::Command(&config.package_sources),
        };
        let packages = load_packages(
            &root,
            source,
            config.timeout(),
            config.output_limit_bytes,
        )?;

        Ok(Self::new(root, config, packages))
    }

    pub fn resolver(&self) -> ModuleResolver<'_> {
        ModuleResolver::new(&self.packages)
    }

    pub fn oracle(&self) -> StalenessOracle<'_> {
        StalenessOracle::new(self.resolver(), &self.mtimes)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(&self.config.build_dir)
    }

    pub fn artifact_path(&self, module: &Path) -> PathBuf {
        artifact_path(&self.root, &self.config.build_dir, module)
    }

    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        discover_tests(&self.root, &self.config.test_dirs, &self.config.build_dir)
    }

    pub fn compiler(&self) -> MocCompiler {
        MocCompiler {
            program: self.config.compiler.clone(),
            flags: self.config.compiler_flags.clone(),
            timeout: self.config.timeout(),
            output_limit_bytes: self.config.output_limit_bytes,
        }
    }

    pub fn runtime(&self) -> WasmtimeRuntime {
        WasmtimeRuntime {
            program: self.config.runtime.clone(),
            workdir: self.root.clone(),
            timeout: self.config.timeout(),
            output_limit_bytes: self.config.output_limit_bytes,
        }
    }
}
