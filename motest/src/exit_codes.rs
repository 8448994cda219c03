//! Stable exit codes for motest CLI commands.

/// Command succeeded; for `motest test`, every test passed.
pub const OK: i32 = 0;
/// Command failed due to invalid config, a failed compilation, or other errors.
pub const INVALID: i32 = 1;
/// `motest test` ran to completion but at least one test failed or was skipped.
pub const TEST_FAILED: i32 = 2;
