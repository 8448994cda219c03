//! Test-only helpers: temporary projects with controlled timestamps and
//! scripted stand-ins for the compiler and runtime.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::core::packages::PackageTable;
use crate::io::compiler::{CompileRequest, Compiler};
use crate::io::config::MotestConfig;
use crate::io::runtime::{RunOutput, Runtime};
use crate::session::Session;

/// A deterministic timestamp `secs` seconds after the Unix epoch.
pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Temporary project directory removed on drop.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative` (creating parents) and set its mtime.
    pub fn write(&self, relative: &str, contents: &str, modified: SystemTime) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        set_modified(&path, modified)?;
        Ok(path)
    }

    /// Set the mtime of an existing file.
    pub fn touch(&self, relative: &str, modified: SystemTime) -> Result<PathBuf> {
        let path = self.path().join(relative);
        set_modified(&path, modified)?;
        Ok(path)
    }
}

fn set_modified(path: &Path, modified: SystemTime) -> Result<()> {
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    file.set_modified(modified)
        .with_context(|| format!("set mtime {}", path.display()))
}

/// Session over `project` with default config and the given package listing.
pub fn session_for(project: &TempProject, listing: &str) -> Session {
    let packages = PackageTable::parse(listing, project.path()).expect("package listing");
    Session::new(project.path(), MotestConfig::default(), packages)
}

/// Compiler that records requests and writes a placeholder artifact.
#[derive(Debug, Default)]
pub struct RecordingCompiler {
    compiled: Mutex<Vec<PathBuf>>,
    package_args: Mutex<Vec<String>>,
    fail_on: Option<PathBuf>,
}

impl RecordingCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail (without writing an artifact) when asked to compile `source`.
    pub fn failing_on(source: &Path) -> Self {
        Self {
            fail_on: Some(source.to_path_buf()),
            ..Self::default()
        }
    }

    /// Sources compiled so far, sorted (compilations run concurrently).
    pub fn compiled(&self) -> Vec<PathBuf> {
        let mut compiled = self.compiled.lock().expect("compiled lock").clone();
        compiled.sort();
        compiled
    }

    /// Package args seen by the most recent compilation.
    pub fn package_args(&self) -> Vec<String> {
        self.package_args.lock().expect("args lock").clone()
    }
}

impl Compiler for RecordingCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<()> {
        if self.fail_on.as_deref() == Some(request.source) {
            bail!("compiling {} failed: scripted failure", request.source.display());
        }
        fs::write(request.output, b"\0asm")
            .with_context(|| format!("write {}", request.output.display()))?;
        self.compiled
            .lock()
            .expect("compiled lock")
            .push(request.source.to_path_buf());
        *self.package_args.lock().expect("args lock") = request.package_args.to_vec();
        Ok(())
    }
}

/// Runtime returning canned results; artifacts whose path ends with one of
/// `failing` exit with status 1.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    failing: Vec<String>,
    invocations: Mutex<Vec<PathBuf>>,
}

impl ScriptedRuntime {
    pub fn passing() -> Self {
        Self::default()
    }

    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<PathBuf> {
        self.invocations.lock().expect("invocations lock").clone()
    }
}

impl Runtime for ScriptedRuntime {
    fn run(&self, artifact: &Path) -> Result<RunOutput> {
        self.invocations
            .lock()
            .expect("invocations lock")
            .push(artifact.to_path_buf());
        let fails = self.failing.iter().any(|name| artifact.ends_with(name));
        Ok(RunOutput {
            success: !fails,
            code: Some(if fails { 1 } else { 0 }),
            stdout: format!("ran {}\n", artifact.display()),
            stderr: if fails {
                "assertion failed\n".to_string()
            } else {
                String::new()
            },
            timed_out: false,
        })
    }
}
