//! Runtime abstraction for executing compiled test artifacts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::io::process::{command_from, run_command};

/// Raw result of executing one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

/// Abstraction over artifact runtimes.
pub trait Runtime {
    /// Execute `artifact` to completion.
    ///
    /// A non-zero exit is reported in [`RunOutput`]; `Err` means the runtime
    /// could not be invoked at all.
    fn run(&self, artifact: &Path) -> Result<RunOutput>;
}

/// Runtime that spawns `wasmtime <artifact>`.
#[derive(Debug, Clone)]
pub struct WasmtimeRuntime {
    /// Program and leading arguments, e.g. `["wasmtime"]`.
    pub program: Vec<String>,
    pub workdir: PathBuf,
    pub timeout: Option<Duration>,
    pub output_limit_bytes: usize,
}

impl Runtime for WasmtimeRuntime {
    #[instrument(skip_all, fields(artifact = %artifact.display()))]
    fn run(&self, artifact: &Path) -> Result<RunOutput> {
        let mut cmd = command_from(&self.program).context("runtime command")?;
        cmd.arg(artifact).current_dir(&self.workdir);

        let output = run_command(cmd, self.timeout, self.output_limit_bytes)
            .with_context(|| format!("run {}", artifact.display()))?;

        let mut stdout = output.stdout_lossy();
        stdout.push_str(&output.truncated_notice("runtime"));
        debug!(exit_code = ?output.status.code(), "artifact finished");
        Ok(RunOutput {
            success: output.status.success() && !output.timed_out,
            code: output.status.code(),
            stdout,
            stderr: output.stderr_lossy(),
            timed_out: output.timed_out,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runtime(script: &str) -> WasmtimeRuntime {
        WasmtimeRuntime {
            program: vec![
                "sh".to_string(),
                "-c".to_string(),
                script.to_string(),
                "wasmtime".to_string(),
            ],
            workdir: std::env::temp_dir(),
            timeout: None,
            output_limit_bytes: 10_000,
        }
    }

    #[test]
    fn passes_artifact_and_captures_output() {
        let output = runtime(r#"echo "running $1""#)
            .run(Path::new("/proj/.wasm/tests/a.test.wasm"))
            .expect("run");
        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.stdout, "running /proj/.wasm/tests/a.test.wasm\n");
    }

    #[test]
    fn nonzero_exit_is_reported_not_raised() {
        let output = runtime("echo 'assertion failed' >&2; exit 1")
            .run(Path::new("a.wasm"))
            .expect("run");
        assert!(!output.success);
        assert_eq!(output.code, Some(1));
        assert_eq!(output.stderr, "assertion failed\n");
    }

    #[test]
    fn missing_runtime_binary_is_an_error() {
        let runtime = WasmtimeRuntime {
            program: vec!["motest-no-such-runtime".to_string()],
            workdir: std::env::temp_dir(),
            timeout: None,
            output_limit_bytes: 10_000,
        };
        assert!(runtime.run(Path::new("a.wasm")).is_err());
    }
}
