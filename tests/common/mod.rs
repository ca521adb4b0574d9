// Shared fixtures for tests that need real repositories.
#![allow(dead_code)]

use git2::{Repository, RepositoryInitOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A working repository on `main` with a bare `origin` it is in sync with
pub struct ReleaseFixture {
    pub root: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl ReleaseFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Could not create temp dir");
        let work = root.path().join("work");
        let remote = root.path().join("origin.git");

        Repository::init_bare(&remote).expect("Could not init bare remote");

        let repo = init_main_repo(&work);
        repo.remote("origin", remote.to_str().expect("utf-8 path"))
            .expect("Could not add remote");

        git(&work, &["push", "origin", "main"]);

        ReleaseFixture { root, work, remote }
    }

    pub fn work_repo(&self) -> Repository {
        Repository::open(&self.work).expect("Could not open work repo")
    }

    pub fn remote_repo(&self) -> Repository {
        Repository::open_bare(&self.remote).expect("Could not open remote repo")
    }

    /// Install an executable fake version tool storing the version in `version.txt`
    ///
    /// `--bump` writes `next`; every call prints the current version.
    #[cfg(unix)]
    pub fn install_version_tool(&self, next: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.root.path().join("bin");
        fs::create_dir_all(&bin).expect("Could not create bin dir");
        let script = bin.join("fake-uv");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\nif [ \"$2\" = \"--bump\" ]; then echo {} > version.txt; fi\ncat version.txt\n",
                next
            ),
        )
        .expect("Could not write version tool");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("Could not make version tool executable");
        script
    }

    /// Make the remote reject every push
    #[cfg(unix)]
    pub fn reject_pushes(&self) {
        use std::os::unix::fs::PermissionsExt;

        let hook = self.remote.join("hooks").join("pre-receive");
        fs::create_dir_all(hook.parent().expect("hook dir")).expect("Could not create hooks dir");
        fs::write(&hook, "#!/bin/sh\necho 'pushes are frozen' >&2\nexit 1\n")
            .expect("Could not write hook");
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755))
            .expect("Could not make hook executable");
    }

    pub fn read_version(&self) -> String {
        fs::read_to_string(self.work.join("version.txt"))
            .expect("Could not read version file")
            .trim()
            .to_string()
    }
}

/// Create a repository whose initial branch is `main` with one commit
pub fn init_main_repo(path: &Path) -> Repository {
    fs::create_dir_all(path).expect("Could not create repo dir");
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(path, &options).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
        config
            .set_bool("tag.gpgSign", false)
            .expect("Could not set tag.gpgSign");
    }

    fs::write(path.join("version.txt"), "1.2.3\n").expect("Could not write version file");
    commit_all(&repo, "Initial commit");
    repo
}

/// Stage everything and commit on HEAD
pub fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().expect("Could not get index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Could not add files to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get sig");

    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("Could not peel HEAD")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Could not create commit")
}

/// Run `git` in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
