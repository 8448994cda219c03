//! Incremental build-and-test orchestration for Motoko test suites.
//!
//! For every discovered test module the orchestrator decides whether the
//! compiled artifact is stale relative to the module and everything it
//! transitively imports, recompiles only the stale ones (concurrently), then
//! runs each artifact sequentially through an external runtime.
//!
//! - **[`core`]**: Pure, deterministic logic (import scanning, specifier
//!   classification, package listings, path conventions). No I/O.
//! - **[`io`]**: Side-effecting operations (filesystem probes, config,
//!   child processes). The compiler and runtime sit behind traits so tests
//!   can substitute scripted implementations.
//!
//! Orchestration modules ([`stale`], [`build`], [`run`]) combine the two,
//! borrowing process-scoped state from a [`session::Session`].

pub mod build;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
pub mod session;
pub mod stale;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
