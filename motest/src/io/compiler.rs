//! Compiler abstraction for building test artifacts.
//!
//! The [`Compiler`] trait decouples build orchestration from the actual
//! compiler binary (currently `moc`). Tests use recording compilers that
//! write placeholder artifacts without spawning processes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument, warn};

use crate::io::process::{command_from, run_command};

/// Parameters for one compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Project root; the compiler runs here so relative package roots resolve.
    pub workdir: &'a Path,
    /// Flattened package listing (`--package <alias> <root>` ...).
    pub package_args: &'a [String],
    pub source: &'a Path,
    pub output: &'a Path,
}

/// Abstraction over compiler backends.
///
/// Compilations run concurrently, so implementations must be `Sync`.
pub trait Compiler: Sync {
    /// Compile `request.source`. Must write the artifact to `request.output`.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<()>;
}

/// Compiler that spawns `moc` (or whatever `program` names).
#[derive(Debug, Clone)]
pub struct MocCompiler {
    /// Program and leading arguments, e.g. `["moc"]`.
    pub program: Vec<String>,
    /// Flags placed after the package args, e.g. `["-wasi-system-api"]`.
    pub flags: Vec<String>,
    pub timeout: Option<Duration>,
    pub output_limit_bytes: usize,
}

impl Compiler for MocCompiler {
    #[instrument(skip_all, fields(source = %request.source.display()))]
    fn compile(&self, request: &CompileRequest<'_>) -> Result<()> {
        let mut cmd = command_from(&self.program).context("compiler command")?;
        cmd.args(request.package_args)
            .args(&self.flags)
            .arg(request.source)
            .arg("-o")
            .arg(request.output)
            .current_dir(request.workdir);

        let output = run_command(cmd, self.timeout, self.output_limit_bytes)
            .with_context(|| format!("run compiler for {}", request.source.display()))?;

        if output.timed_out {
            warn!("compiler timed out");
            bail!(
                "compiling {} timed out after {:?}",
                request.source.display(),
                self.timeout.unwrap_or_default()
            );
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "compiler failed");
            bail!(
                "compiling {} failed with status {:?}:\n{}{}",
                request.source.display(),
                output.status.code(),
                output.stderr_lossy().trim_end(),
                output.truncated_notice("compiler")
            );
        }
        if !request.output.is_file() {
            bail!(
                "compiler exited successfully but produced no artifact at {}",
                request.output.display()
            );
        }

        debug!(output = %request.output.display(), "compiled");
        Ok(())
    }
}
