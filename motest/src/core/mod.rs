//! Deterministic, pure logic shared by the orchestrator.
//!
//! Core modules must be free of I/O side effects. They operate on source text,
//! package listings and paths, and return deterministic outputs suitable for
//! tests.

pub mod imports;
pub mod packages;
pub mod path;
pub mod specifier;
