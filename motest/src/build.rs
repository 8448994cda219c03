//! Build orchestration: decide which test artifacts are stale and recompile them.
//!
//! Every discovered module gets its own scoped thread that makes the compile
//! decision and, when needed, runs the compiler. All threads are joined before
//! returning; the first failure in discovery order aborts the build.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::io::compiler::{CompileRequest, Compiler};
use crate::io::mtime::read_modified;
use crate::session::Session;

/// Why an artifact is (re)compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileReason {
    MissingArtifact,
    Outdated,
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDecision {
    Fresh,
    Compile(CompileReason),
}

impl BuildDecision {
    pub fn needs_compile(self) -> bool {
        matches!(self, BuildDecision::Compile(_))
    }
}

impl fmt::Display for BuildDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildDecision::Fresh => "fresh",
            BuildDecision::Compile(CompileReason::MissingArtifact) => "missing",
            BuildDecision::Compile(CompileReason::Outdated) => "stale",
            BuildDecision::Compile(CompileReason::Forced) => "forced",
        };
        f.write_str(label)
    }
}

/// Decision (and, after a build, the action taken) for one test module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub module: PathBuf,
    pub artifact: PathBuf,
    pub decision: BuildDecision,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Recompile every module regardless of timestamps.
    pub force: bool,
}

/// Decide whether `module` needs compiling without compiling it.
///
/// A missing artifact is decided without walking the import graph.
pub fn plan_module(session: &Session, module: &Path, options: BuildOptions) -> Result<BuildOutcome> {
    let artifact = session.artifact_path(module);
    let decision = if options.force {
        BuildDecision::Compile(CompileReason::Forced)
    } else {
        match read_modified(&artifact)? {
            None => BuildDecision::Compile(CompileReason::MissingArtifact),
            Some(built_at) => {
                if session.oracle().check(module, built_at)? {
                    BuildDecision::Compile(CompileReason::Outdated)
                } else {
                    BuildDecision::Fresh
                }
            }
        }
    };

    debug!(module = %module.display(), %decision, "planned");
    Ok(BuildOutcome {
        module: module.to_path_buf(),
        artifact,
        decision,
    })
}

/// Plan every module, in order, without compiling anything.
pub fn plan_all(
    session: &Session,
    modules: &[PathBuf],
    options: BuildOptions,
) -> Result<Vec<BuildOutcome>> {
    modules
        .iter()
        .map(|module| plan_module(session, module, options))
        .collect()
}

/// Plan `module` and compile it if the plan says so.
#[instrument(skip_all, fields(module = %module.display()))]
pub fn build_module<C: Compiler>(
    session: &Session,
    compiler: &C,
    module: &Path,
    options: BuildOptions,
) -> Result<BuildOutcome> {
    let outcome = plan_module(session, module, options)?;
    if !outcome.decision.needs_compile() {
        return Ok(outcome);
    }

    if let Some(parent) = outcome.artifact.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create artifact dir {}", parent.display()))?;
    }

    info!(reason = %outcome.decision, "compiling");
    compiler.compile(&CompileRequest {
        workdir: &session.root,
        package_args: session.packages.compiler_args(),
        source: &outcome.module,
        output: &outcome.artifact,
    })?;

    Ok(outcome)
}

/// Build all `modules` concurrently and return their outcomes in input order.
///
/// Blocks until every task has finished. Any failure fails the whole build.
pub fn build_all<C: Compiler>(
    session: &Session,
    compiler: &C,
    modules: &[PathBuf],
    options: BuildOptions,
) -> Result<Vec<BuildOutcome>> {
    let results: Vec<Result<BuildOutcome>> = thread::scope(|scope| {
        let handles: Vec<_> = modules
            .iter()
            .map(|module| scope.spawn(move || build_module(session, compiler, module, options)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("build task panicked")))
            })
            .collect()
    });

    let outcomes = results.into_iter().collect::<Result<Vec<_>>>()?;
    let compiled = outcomes
        .iter()
        .filter(|outcome| outcome.decision.needs_compile())
        .count();
    info!(total = outcomes.len(), compiled, "build finished");
    Ok(outcomes)
}
