//! Sequential execution of compiled test artifacts.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::io::runtime::{RunOutput, Runtime};

/// Result of executing one artifact.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub artifact: PathBuf,
    pub output: RunOutput,
    pub duration: Duration,
}

impl TestRun {
    pub fn passed(&self) -> bool {
        self.output.success
    }
}

/// Execute `artifacts` one at a time, in order.
///
/// `on_finish` sees each result as soon as its process exits, so callers can
/// stream output. With `fail_fast` the loop stops after the first failing
/// artifact; the remaining ones are not run. An `Err` means the runtime itself
/// could not be invoked and aborts the loop regardless of `fail_fast`.
pub fn run_artifacts<R, F>(
    runtime: &R,
    artifacts: &[PathBuf],
    fail_fast: bool,
    mut on_finish: F,
) -> Result<Vec<TestRun>>
where
    R: Runtime,
    F: FnMut(&TestRun),
{
    let mut runs = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let start = Instant::now();
        let output = runtime.run(artifact)?;
        let run = TestRun {
            artifact: artifact.clone(),
            output,
            duration: start.elapsed(),
        };
        on_finish(&run);

        let failed = !run.passed();
        if failed {
            warn!(artifact = %artifact.display(), code = ?run.output.code, "test failed");
        }
        runs.push(run);
        if failed && fail_fast {
            info!(skipped = artifacts.len() - runs.len(), "stopping after first failure");
            break;
        }
    }

    Ok(runs)
}

/// Pass/fail counts over a suite of `total` artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    /// Artifacts skipped because an earlier one failed under fail-fast.
    pub not_run: usize,
}

impl Summary {
    pub fn from_runs(runs: &[TestRun], total: usize) -> Self {
        let passed = runs.iter().filter(|run| run.passed()).count();
        let failed = runs.len() - passed;
        Self {
            passed,
            failed,
            not_run: total.saturating_sub(runs.len()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.not_run == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRuntime;

    fn artifacts(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn runs_every_artifact_in_order() {
        let runtime = ScriptedRuntime::passing();
        let list = artifacts(&["a.wasm", "b.wasm", "c.wasm"]);
        let mut streamed = Vec::new();

        let runs = run_artifacts(&runtime, &list, true, |run| {
            streamed.push(run.artifact.clone());
        })
        .expect("run");

        assert_eq!(runtime.invocations(), list);
        assert_eq!(streamed, list);
        assert!(runs.iter().all(TestRun::passed));
        assert_eq!(
            Summary::from_runs(&runs, list.len()),
            Summary {
                passed: 3,
                failed: 0,
                not_run: 0
            }
        );
    }

    #[test]
    fn fail_fast_stops_after_first_failure() {
        let runtime = ScriptedRuntime::failing_on(&["b.wasm"]);
        let list = artifacts(&["a.wasm", "b.wasm", "c.wasm"]);

        let runs = run_artifacts(&runtime, &list, true, |_| {}).expect("run");

        assert_eq!(runtime.invocations(), artifacts(&["a.wasm", "b.wasm"]));
        let summary = Summary::from_runs(&runs, list.len());
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.not_run, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn without_fail_fast_every_artifact_runs() {
        let runtime = ScriptedRuntime::failing_on(&["a.wasm", "c.wasm"]);
        let list = artifacts(&["a.wasm", "b.wasm", "c.wasm"]);

        let runs = run_artifacts(&runtime, &list, false, |_| {}).expect("run");

        assert_eq!(runtime.invocations(), list);
        let summary = Summary::from_runs(&runs, list.len());
        assert_eq!((summary.passed, summary.failed, summary.not_run), (1, 2, 0));
    }

    #[test]
    fn empty_suite_is_successful() {
        let runtime = ScriptedRuntime::passing();
        let runs = run_artifacts(&runtime, &[], true, |_| {}).expect("run");
        assert!(runs.is_empty());
        assert!(Summary::from_runs(&runs, 0).is_success());
    }
}
