#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Oid, Repository, RepositoryInitOptions, ResetType, Signature};

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(path, contents).expect("Failed to write file");
}

/// `git init <path> -b <branch>`
pub fn init(path: &Path, branch: &str) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(branch);
    Repository::init_opts(path, &opts).expect("Failed to init repository")
}

/// Stages `file` and commits it on HEAD.
pub fn commit(repo: &Repository, file: &str, contents: &str) -> Oid {
    let workdir = repo.workdir().expect("bare repository");
    write_file(&workdir.join(file), contents);
    stage(repo, file);

    let mut index = repo.index().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("gitsum tester", "gitsum@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, file, &tree, &parents)
        .expect("Failed to commit")
}

/// `git add <file>`
pub fn stage(repo: &Repository, file: &str) {
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();
}

/// `git clone <origin> <dest>`
pub fn clone(origin: &Path, dest: &Path) -> Repository {
    let url = origin.to_str().expect("temp dirs are valid UTF-8");
    Repository::clone(url, dest).expect("Failed to clone")
}

/// `git reset --hard HEAD~<n>`
pub fn reset_hard(repo: &Repository, n: usize) {
    let target = repo.revparse_single(&format!("HEAD~{n}")).unwrap();
    repo.reset(&target, ResetType::Hard, None).unwrap();
}

/// A repository on `main` with `n` commits, standing in for a remote.
pub fn origin_with_commits(path: &Path, n: usize) -> Repository {
    let repo = init(path, "main");
    for i in 0..n {
        commit(&repo, &format!("{i}.txt"), &i.to_string());
    }
    repo
}

/// `git checkout <branch>`, creating the branch at HEAD when `new` is set.
pub fn checkout_branch(repo: &Repository, branch: &str, new: bool) {
    if new {
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.branch(branch, &head, false).unwrap();
    }
    repo.set_head(&format!("refs/heads/{branch}")).unwrap();
    repo.checkout_head(Some(CheckoutBuilder::new().force()))
        .unwrap();
}

/// `git checkout <commit>`
pub fn checkout_detached(repo: &Repository, commit: Oid) {
    repo.set_head_detached(commit).unwrap();
    repo.checkout_head(Some(CheckoutBuilder::new().force()))
        .unwrap();
}

/// `git merge <branch>`, leaving any conflicts in the index.
pub fn merge(repo: &Repository, branch: &str) {
    let reference = repo
        .find_reference(&format!("refs/heads/{branch}"))
        .unwrap();
    let annotated = repo.reference_to_annotated_commit(&reference).unwrap();
    repo.merge(&[&annotated], None, None).unwrap();
}
