use std::fs;
use std::path::Path;

use git2::{
    Branch, Cred, CredentialType, ErrorCode, FetchOptions, RemoteCallbacks, Repository,
    StatusOptions,
};
use tracing::{debug, warn};

use crate::repo_search::to_slash;

/// Head label of a repository without any commits.
pub const NO_COMMITS: &str = "(no commits)";

const SHORT_HASH_LEN: usize = 6;
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// A snapshot of one repository, taken once per run.
///
/// `ahead` and `behind` are only ever non-zero when `has_upstream` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    /// Path of the working tree relative to the directory the scan started in.
    pub name: String,
    /// Branch name, `(no commits)`, or `(abc123)` for a detached head.
    pub head: String,
    /// The repository has no remotes at all.
    pub is_local: bool,
    pub has_changes: bool,
    pub has_upstream: bool,
    pub ahead: usize,
    pub behind: usize,
}

impl RepoStatus {
    /// Reads the status of `repo`. When `fetch` is set and the current branch
    /// tracks an upstream, the upstream's remote is fetched first; a failed
    /// fetch only produces a warning.
    pub fn read(repo: &Repository, base: &Path, fetch: bool) -> Result<Self, git2::Error> {
        let name = repo_name(repo, base);
        let mut has_upstream = false;
        let (mut ahead, mut behind) = (0, 0);

        let head = match repo.head() {
            Err(e) if e.code() == ErrorCode::UnbornBranch => NO_COMMITS.to_string(),
            Err(e) => return Err(e),
            Ok(head) if !head.is_branch() => {
                let id = head.peel_to_commit()?.id().to_string();
                format!("({})", &id[..SHORT_HASH_LEN])
            }
            Ok(head) => {
                let label = String::from_utf8_lossy(head.shorthand_bytes()).into_owned();
                let branch = Branch::wrap(head);

                if upstream_of(&branch)?.is_some() {
                    has_upstream = true;
                    if fetch {
                        if let Err(e) = fetch_upstream(repo, &branch) {
                            warn!("Failed to fetch repo '{}'", name);
                            debug!("fetch of '{}' failed: {}", name, e.message());
                        }
                    }
                    // Looked up again since a fetch may have moved it.
                    let upstream_tip = upstream_of(&branch)?.and_then(|u| u.get().target());
                    if let (Some(local), Some(upstream)) = (branch.get().target(), upstream_tip) {
                        (ahead, behind) = repo.graph_ahead_behind(local, upstream)?;
                    }
                }
                label
            }
        };

        let is_local = repo.remotes()?.is_empty();
        let has_changes = has_changes(repo)?;

        Ok(Self {
            name,
            head,
            is_local,
            has_changes,
            has_upstream,
            ahead,
            behind,
        })
    }

    /// Clean, and either not tracking anything or level with the upstream.
    pub fn is_up_to_date(&self) -> bool {
        !self.has_changes && (!self.has_upstream || (self.ahead == 0 && self.behind == 0))
    }
}

fn upstream_of<'repo>(branch: &Branch<'repo>) -> Result<Option<Branch<'repo>>, git2::Error> {
    match branch.upstream() {
        Ok(upstream) => Ok(Some(upstream)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn has_changes(repo: &Repository) -> Result<bool, git2::Error> {
    if repo.is_bare() {
        return Ok(false);
    }
    let mut options = StatusOptions::new();
    options.include_untracked(true).include_ignored(false);
    Ok(!repo.statuses(Some(&mut options))?.is_empty())
}

fn fetch_upstream(repo: &Repository, branch: &Branch<'_>) -> Result<(), git2::Error> {
    let refname = branch
        .get()
        .name()
        .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8"))?;
    let remote_name = repo.branch_upstream_remote(refname)?;
    let remote_name = remote_name
        .as_str()
        .ok_or_else(|| git2::Error::from_str("remote name is not valid UTF-8"))?;
    let mut remote = repo.find_remote(remote_name)?;
    debug!("fetching {} for {}", remote_name, refname);

    let config = repo.config()?;
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|url, username, allowed| {
        // libgit2 keeps asking as long as we keep answering.
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("no usable credentials"));
        }
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            if let Some(user) = username {
                return Cred::ssh_key_from_agent(user);
            }
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return Cred::credential_helper(&config, url, username);
        }
        Cred::default()
    });

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    remote.fetch(&[] as &[&str], Some(&mut options), None)
}

/// Name of `repo` relative to `base`. The name always ends with the
/// repository's directory name, so a repository at or above `base` shows up
/// as `../repo` or `../../repo`.
pub fn repo_name(repo: &Repository, base: &Path) -> String {
    let path = repo.workdir().unwrap_or_else(|| repo.path());
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let base = fs::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
    relative_name(&path, &base)
}

fn relative_name(repo_path: &Path, base: &Path) -> String {
    if let Ok(rel) = repo_path.strip_prefix(base) {
        if !rel.as_os_str().is_empty() {
            return to_slash(rel);
        }
    }
    if let Ok(rel) = base.strip_prefix(repo_path) {
        let dir_name = repo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return format!("{}{}", "../".repeat(rel.components().count() + 1), dir_name);
    }
    repo_path.display().to_string()
}
