use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::warn;

pub mod cli;
pub mod config;
pub mod logger;
pub mod repo_search;
pub mod repo_status;
pub mod report;

use config::Config;
use repo_status::{repo_name, RepoStatus};

/// Scans `root` and writes the report to `out`: outside entries when asked
/// for, then the repository count and one status line per repository.
pub fn run(root: &Path, config: &Config, out: &mut dyn Write) -> Result<()> {
    let scan = repo_search::find_git_repos(root);

    if config.lists_outside_files() {
        for path in scan.outside_paths() {
            writeln!(out, "OUTSIDE: {}", path.display_relative(root))?;
        }
    }
    if config.only_outside_files {
        return Ok(());
    }

    writeln!(out, "{}", report::summary_line(scan.repos.len()))?;

    let mut statuses = Vec::with_capacity(scan.repos.len());
    for repo in &scan.repos {
        match RepoStatus::read(repo, root, config.fetch) {
            Ok(status) => statuses.push(status),
            Err(e) => warn!(
                "Failed to read repo '{}': {}",
                repo_name(repo, root),
                e.message()
            ),
        }
    }

    for line in report::status_lines(&statuses) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
