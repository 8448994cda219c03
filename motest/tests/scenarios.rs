//! End-to-end orchestration scenarios: discovery → staleness → build → run.
//!
//! These drive the library with a recording compiler and a scripted runtime,
//! so no Motoko toolchain is needed. Timestamps are pinned explicitly.

use std::path::PathBuf;

use motest::build::{BuildDecision, BuildOptions, CompileReason, build_all};
use motest::run::{Summary, run_artifacts};
use motest::test_support::{RecordingCompiler, ScriptedRuntime, TempProject, at, session_for};

const LISTING: &str = "--package base pkgs/base\n";

/// Package table `{ base: <root>/pkgs/base }`; `tests/a.test.mo` imports
/// `mo:base/List`; the artifact was written at t=100.
fn base_project(list_mtime: u64) -> TempProject {
    let project = TempProject::new().expect("project");
    project
        .write(
            "tests/a.test.mo",
            "import List \"mo:base/List\";\n\nactor {}\n",
            at(40),
        )
        .expect("test module");
    project
        .write("pkgs/base/List.mo", "module {}\n", at(list_mtime))
        .expect("package module");
    project
        .write(".wasm/tests/a.test.wasm", "\0asm", at(100))
        .expect("artifact");
    project
}

#[test]
fn older_dependency_leaves_artifact_alone_and_runs_it() {
    let project = base_project(50);
    let session = session_for(&project, LISTING);
    let compiler = RecordingCompiler::new();
    let runtime = ScriptedRuntime::passing();

    let modules = session.discover().expect("discover");
    assert_eq!(modules, vec![session.root.join("tests/a.test.mo")]);

    let outcomes = build_all(&session, &compiler, &modules, BuildOptions::default())
        .expect("build");
    assert_eq!(outcomes[0].decision, BuildDecision::Fresh);
    assert!(compiler.compiled().is_empty());

    let artifacts: Vec<PathBuf> = outcomes.into_iter().map(|o| o.artifact).collect();
    let runs = run_artifacts(&runtime, &artifacts, true, |_| {}).expect("run");
    assert_eq!(
        runtime.invocations(),
        vec![session.root.join(".wasm/tests/a.test.wasm")]
    );
    assert!(Summary::from_runs(&runs, artifacts.len()).is_success());
}

#[test]
fn newer_dependency_recompiles_then_runs_new_artifact() {
    let project = base_project(150);
    let session = session_for(&project, LISTING);
    let compiler = RecordingCompiler::new();
    let runtime = ScriptedRuntime::passing();

    let modules = session.discover().expect("discover");
    let outcomes = build_all(&session, &compiler, &modules, BuildOptions::default())
        .expect("build");
    assert_eq!(
        outcomes[0].decision,
        BuildDecision::Compile(CompileReason::Outdated)
    );
    assert_eq!(compiler.compiled(), modules);

    let artifacts: Vec<PathBuf> = outcomes.into_iter().map(|o| o.artifact).collect();
    run_artifacts(&runtime, &artifacts, true, |_| {}).expect("run");
    assert_eq!(runtime.invocations(), artifacts);
}

#[test]
fn absent_artifact_is_compiled() {
    let project = TempProject::new().expect("project");
    project
        .write("test/nested/b.Test.mo", "import Gone \"mo:unknown/Gone\";\n", at(10))
        .expect("test module");
    let session = session_for(&project, LISTING);
    let compiler = RecordingCompiler::new();

    let modules = session.discover().expect("discover");
    let outcomes = build_all(&session, &compiler, &modules, BuildOptions::default())
        .expect("build");

    assert_eq!(
        outcomes[0].decision,
        BuildDecision::Compile(CompileReason::MissingArtifact)
    );
    assert!(session.root.join(".wasm/test/nested/b.Test.wasm").is_file());
}

#[test]
fn only_stale_modules_recompile_across_a_suite() {
    let project = TempProject::new().expect("project");
    project
        .write("src/Shared.mo", "import Inner \"./inner\";\nmodule {}\n", at(10))
        .expect("shared");
    project
        .write("src/inner/lib.mo", "module {}\n", at(10))
        .expect("inner");
    project
        .write("tests/uses_shared.test.mo", "import S \"../src/Shared\";\n", at(10))
        .expect("a");
    project
        .write("tests/standalone.test.mo", "actor {}\n", at(10))
        .expect("b");
    project
        .write(".wasm/tests/uses_shared.test.wasm", "\0asm", at(100))
        .expect("artifact a");
    project
        .write(".wasm/tests/standalone.test.wasm", "\0asm", at(100))
        .expect("artifact b");
    project.touch("src/inner/lib.mo", at(200)).expect("touch");

    let session = session_for(&project, "");
    let compiler = RecordingCompiler::new();
    let modules = session.discover().expect("discover");
    build_all(&session, &compiler, &modules, BuildOptions::default()).expect("build");

    assert_eq!(
        compiler.compiled(),
        vec![session.root.join("tests/uses_shared.test.mo")]
    );
}

#[test]
fn failing_test_stops_the_suite_under_fail_fast() {
    let project = TempProject::new().expect("project");
    for name in ["a", "b", "c"] {
        project
            .write(&format!("tests/{name}.test.mo"), "actor {}\n", at(10))
            .expect("module");
    }
    let session = session_for(&project, "");
    let compiler = RecordingCompiler::new();
    let runtime = ScriptedRuntime::failing_on(&["b.test.wasm"]);

    let modules = session.discover().expect("discover");
    let outcomes = build_all(&session, &compiler, &modules, BuildOptions::default())
        .expect("build");
    let artifacts: Vec<PathBuf> = outcomes.into_iter().map(|o| o.artifact).collect();
    let runs = run_artifacts(&runtime, &artifacts, true, |_| {}).expect("run");

    let summary = Summary::from_runs(&runs, artifacts.len());
    assert_eq!((summary.passed, summary.failed, summary.not_run), (1, 1, 1));
    assert_eq!(runs[1].output.stderr, "assertion failed\n");
}
