//! Side-effecting helpers: filesystem probes, configuration, and child processes.

pub mod compiler;
pub mod config;
pub mod discover;
pub mod mtime;
pub mod packages;
pub mod process;
pub mod resolver;
pub mod runtime;
