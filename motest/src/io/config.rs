//! Project configuration stored in `motest.toml` at the project root.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "motest.toml";

/// Orchestrator configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the standard
/// Motoko toolchain (`moc`, `wasmtime`, `mops sources`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MotestConfig {
    /// Compiler program and leading arguments.
    pub compiler: Vec<String>,

    /// Flags passed after the package arguments and before the source path.
    pub compiler_flags: Vec<String>,

    /// Runtime program and leading arguments; the artifact path is appended.
    pub runtime: Vec<String>,

    /// Command printing the package listing (`<flag> <alias> <root>` per line).
    pub package_sources: Vec<String>,

    /// Hidden directory under the project root that receives artifacts.
    pub build_dir: String,

    /// Directories directly under the project root searched for tests.
    pub test_dirs: Vec<String>,

    /// Stop running artifacts after the first failure.
    pub fail_fast: bool,

    /// Keep at most this many bytes of each child's stdout/stderr.
    pub output_limit_bytes: usize,

    /// Kill compiler/runtime processes after this many seconds. Unset: wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for MotestConfig {
    fn default() -> Self {
        Self {
            compiler: vec!["moc".to_string()],
            compiler_flags: vec!["-wasi-system-api".to_string()],
            runtime: vec!["wasmtime".to_string()],
            package_sources: vec!["mops".to_string(), "sources".to_string()],
            build_dir: ".wasm".to_string(),
            test_dirs: vec!["test".to_string(), "tests".to_string()],
            fail_fast: true,
            output_limit_bytes: 1_000_000,
            timeout_secs: None,
        }
    }
}

impl MotestConfig {
    pub fn validate(&self) -> Result<()> {
        if is_blank_command(&self.compiler) {
            return Err(anyhow!("compiler must be a non-empty array"));
        }
        if is_blank_command(&self.runtime) {
            return Err(anyhow!("runtime must be a non-empty array"));
        }
        if is_blank_command(&self.package_sources) {
            return Err(anyhow!("package_sources must be a non-empty array"));
        }
        if !is_single_segment(&self.build_dir) {
            return Err(anyhow!(
                "build_dir must be a single directory name, got `{}`",
                self.build_dir
            ));
        }
        if self.test_dirs.is_empty() || !self.test_dirs.iter().all(|d| is_single_segment(d)) {
            return Err(anyhow!(
                "test_dirs must be a non-empty array of directory names"
            ));
        }
        if self.test_dirs.contains(&self.build_dir) {
            return Err(anyhow!("build_dir must not also be a test directory"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0 when set"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn is_blank_command(command: &[String]) -> bool {
    command.first().is_none_or(|program| program.trim().is_empty())
}

fn is_single_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MotestConfig::default()`.
pub fn load_config(path: &Path) -> Result<MotestConfig> {
    if !path.exists() {
        let cfg = MotestConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MotestConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &MotestConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
