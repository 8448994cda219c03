//! Loading the package source listing.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::core::packages::PackageTable;
use crate::io::process::{command_from, run_command};

/// Where the package listing comes from.
#[derive(Debug, Clone)]
pub enum PackageSource<'a> {
    /// Run a command in the project root and read its stdout (`mops sources`).
    Command(&'a [String]),
    /// Read a file holding a previously captured listing.
    File(&'a Path),
}

/// Obtain the listing and build the package table for `root`.
pub fn load_packages(
    root: &Path,
    source: PackageSource<'_>,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<PackageTable> {
    let listing = match source {
        PackageSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("read package listing {}", path.display()))?,
        PackageSource::Command(program) => {
            let mut cmd = command_from(program).context("package_sources command")?;
            cmd.current_dir(root);
            let output = run_command(cmd, timeout, output_limit_bytes)
                .with_context(|| format!("run `{}`", program.join(" ")))?;
            if output.timed_out || !output.status.success() {
                bail!(
                    "`{}` failed with status {:?}:\n{}",
                    program.join(" "),
                    output.status.code(),
                    output.stderr_lossy().trim_end()
                );
            }
            if output.stdout_truncated > 0 {
                bail!(
                    "`{}` output exceeded {} bytes",
                    program.join(" "),
                    output_limit_bytes
                );
            }
            output.stdout_lossy()
        }
    };

    debug!(bytes = listing.len(), "read package listing");
    let table = PackageTable::parse(&listing, root)?;
    info!(packages = table.len(), "loaded package table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TempProject, at};

    #[test]
    fn reads_listing_from_file() {
        let project = TempProject::new().expect("project");
        let listing = project
            .write("sources.txt", "--package base .mops/base/src\n", at(1))
            .expect("write");

        let table = load_packages(project.path(), PackageSource::File(&listing), None, 1024)
            .expect("load");
        assert_eq!(
            table.root("base"),
            Some(project.path().join(".mops/base/src").as_path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_listing_command_in_project_root() {
        let project = TempProject::new().expect("project");
        let program = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo \"--package here $(pwd)/src\"".to_string(),
        ];

        let table = load_packages(project.path(), PackageSource::Command(&program), None, 1024)
            .expect("load");
        let root = table.root("here").expect("alias");
        assert!(root.ends_with("src"));
        assert_eq!(table.compiler_args().len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn failing_listing_command_is_an_error() {
        let project = TempProject::new().expect("project");
        let program = vec!["sh".to_string(), "-c".to_string(), "exit 2".to_string()];
        assert!(
            load_packages(project.path(), PackageSource::Command(&program), None, 1024).is_err()
        );
    }
}
