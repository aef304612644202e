use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use git2::{ErrorCode, Repository, RepositoryOpenFlags};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A filesystem entry with no repository anywhere beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutsidePath {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl OutsidePath {
    /// The path relative to `root` with `/` separators. Directories get a
    /// trailing `/` and the root itself renders as `./`.
    pub fn display_relative(&self, root: &Path) -> String {
        let mut s = relative_display(&self.path, root);
        if self.is_dir {
            s.push('/');
        }
        s
    }
}

/// `path` relative to `root` with `/` separators, `.` for the root itself.
fn relative_display(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => to_slash(rel),
        Err(_) => path.display().to_string(),
    }
}

/// Joins the components of a relative path with `/` regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Everything found beneath a root directory.
#[derive(Default)]
pub struct Scan {
    pub repos: Vec<Repository>,
    outside: Vec<OutsidePath>,
}

impl Scan {
    fn repo(repo: Repository) -> Self {
        Self {
            repos: vec![repo],
            outside: vec![],
        }
    }

    fn outside(path: &Path, is_dir: bool) -> Self {
        Self {
            repos: vec![],
            outside: vec![OutsidePath {
                path: path.to_path_buf(),
                is_dir,
            }],
        }
    }

    fn merge(&mut self, other: Scan) {
        self.repos.extend(other.repos);
        self.outside.extend(other.outside);
    }

    /// Outside entries in lexicographic order of their full path.
    pub fn outside_paths(&self) -> Vec<&OutsidePath> {
        let mut paths: Vec<&OutsidePath> = self.outside.iter().collect();
        paths.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        paths
    }
}

/// Recursively searches for repositories starting in (and including) `root`.
///
/// `root` itself is also matched against any repository enclosing it, so
/// running from inside a working tree finds that working tree. Below the root
/// only directories that are repositories themselves count. A repository is
/// never searched for nested repositories.
pub fn find_git_repos(root: &Path) -> Scan {
    walk(root, root, true)
}

fn walk(root: &Path, path: &Path, search_parents: bool) -> Scan {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!("cannot stat {}: {}", path.display(), e);
            return Scan::outside(path, false);
        }
    };
    // Symlinks are not followed, which also keeps the walk free of cycles.
    if !meta.is_dir() {
        return Scan::outside(path, false);
    }

    match open(path, search_parents) {
        Ok(Some(repo)) => {
            debug!("found repository at {}", path.display());
            return Scan::repo(repo);
        }
        Ok(None) => {}
        Err(e) => {
            warn!(
                "Failed to open repo at '{}': {}",
                relative_display(path, root),
                e.message()
            );
            return Scan::default();
        }
    }

    let mut scan = Scan::default();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => scan.merge(walk(root, entry.path(), false)),
            Err(e) => debug!("cannot read {}: {}", path.display(), e),
        }
    }

    if scan.repos.is_empty() {
        // Nothing versioned in here, so report the directory once instead of
        // every file in it.
        Scan::outside(path, true)
    } else {
        scan
    }
}

fn open(dir: &Path, search_parents: bool) -> Result<Option<Repository>, git2::Error> {
    let flags = if search_parents {
        RepositoryOpenFlags::empty()
    } else {
        RepositoryOpenFlags::NO_SEARCH
    };
    match Repository::open_ext(dir, flags, std::iter::empty::<&OsStr>()) {
        Ok(repo) => Ok(Some(repo)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
