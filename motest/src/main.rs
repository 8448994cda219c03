//! Incremental build-and-test runner for Motoko projects.
//!
//! Discovers `*.test.mo` modules under `test/` or `tests/`, recompiles only
//! those whose artifact under `.wasm/` is older than the module or anything it
//! imports, then runs every artifact through the runtime.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use motest::build::{BuildOptions, BuildOutcome, build_all, plan_all};
use motest::core::path::display_relative;
use motest::exit_codes;
use motest::io::config::{CONFIG_FILE, MotestConfig, write_config};
use motest::logging;
use motest::run::{Summary, TestRun, run_artifacts};
use motest::session::{Session, SessionOptions};

#[derive(Parser)]
#[command(
    name = "motest",
    version,
    about = "Incremental build-and-test runner for Motoko test suites"
)]
struct Cli {
    /// Project root containing `test/` or `tests/`.
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Config file (defaults to `<project-dir>/motest.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the package listing from a file instead of running `package_sources`.
    #[arg(long, global = true)]
    packages_file: Option<PathBuf>,

    /// Enable debug tracing on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `motest.toml`.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Show whether each test artifact is fresh, stale, or missing.
    Status,
    /// Compile stale test modules.
    Build {
        /// Recompile every test module.
        #[arg(short, long)]
        force: bool,
    },
    /// Compile stale test modules, then run every test artifact.
    Test {
        /// Recompile every test module.
        #[arg(short, long)]
        force: bool,
        /// Keep running after a failing test.
        #[arg(long)]
        no_fail_fast: bool,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Init { force } => cmd_init(&cli, force),
        Command::Status => cmd_status(&open_session(&cli)?),
        Command::Build { force } => {
            cmd_build(&open_session(&cli)?, BuildOptions { force })?;
            Ok(exit_codes::OK)
        }
        Command::Test {
            force,
            no_fail_fast,
        } => cmd_test(&open_session(&cli)?, BuildOptions { force }, !no_fail_fast),
    }
}

fn open_session(cli: &Cli) -> Result<Session> {
    Session::open(
        &cli.project_dir,
        &SessionOptions {
            config_path: cli.config.clone(),
            packages_file: cli.packages_file.clone(),
        },
    )
}

fn cmd_init(cli: &Cli, force: bool) -> Result<i32> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.project_dir.join(CONFIG_FILE));
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    write_config(&path, &MotestConfig::default())?;
    println!("Wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_status(session: &Session) -> Result<i32> {
    let modules = session.discover()?;
    if modules.is_empty() {
        print_no_tests(session);
        return Ok(exit_codes::OK);
    }
    for outcome in plan_all(session, &modules, BuildOptions::default())? {
        println!(
            "{:>8}  {}",
            outcome.decision.to_string(),
            display_relative(&session.root, &outcome.module)
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_build(session: &Session, options: BuildOptions) -> Result<Vec<BuildOutcome>> {
    let modules = session.discover()?;
    if modules.is_empty() {
        print_no_tests(session);
        return Ok(Vec::new());
    }

    let compiler = session.compiler();
    let outcomes = build_all(session, &compiler, &modules, options)?;
    let mut compiled = 0;
    for outcome in outcomes.iter().filter(|o| o.decision.needs_compile()) {
        compiled += 1;
        println!(
            "Compiled {} ({})",
            display_relative(&session.root, &outcome.module),
            outcome.decision
        );
    }
    if compiled == 0 {
        println!("All {} test artifacts are up to date", outcomes.len());
    }
    Ok(outcomes)
}

fn cmd_test(session: &Session, options: BuildOptions, fail_fast: bool) -> Result<i32> {
    let outcomes = cmd_build(session, options)?;
    if outcomes.is_empty() {
        return Ok(exit_codes::OK);
    }

    let artifacts: Vec<PathBuf> = outcomes.into_iter().map(|o| o.artifact).collect();
    let fail_fast = fail_fast && session.config.fail_fast;
    let runtime = session.runtime();
    let runs = run_artifacts(&runtime, &artifacts, fail_fast, |run| {
        print_run(&session.root, run);
    })?;

    let summary = Summary::from_runs(&runs, artifacts.len());
    println!(
        "\n{} passed, {} failed, {} not run",
        summary.passed, summary.failed, summary.not_run
    );
    if summary.is_success() {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::TEST_FAILED)
    }
}

fn print_run(root: &Path, run: &TestRun) {
    let status = if run.passed() { "PASS" } else { "FAIL" };
    println!(
        "{status} {} ({} ms)",
        display_relative(root, &run.artifact),
        run.duration.as_millis()
    );
    if !run.output.stdout.is_empty() {
        print!("{}", run.output.stdout);
    }
    if !run.passed() {
        if run.output.timed_out {
            println!("[timed out]");
        }
        if !run.output.stderr.is_empty() {
            print!("{}", run.output.stderr);
        }
    }
}

fn print_no_tests(session: &Session) {
    println!(
        "No test modules found under {} in {}",
        session.config.test_dirs.join(", "),
        session.root.display()
    );
}
