use crate::error::{ReleaseError, Result};
use git2::{
    BranchType, ErrorCode, ObjectType, Oid, Repository as Git2Repo, ResetType,
    Status, StatusOptions,
};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
///
/// Local reads and writes go through libgit2. Signed tags and atomic pushes
/// are delegated to the `git` executable, which libgit2 does not cover.
pub struct Git2Repository {
    repo: Git2Repo,
    gpg_program: String,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)
            .map_err(|e| ReleaseError::NotARepository(e.message().to_string()))?;

        if repo.is_bare() {
            return Err(ReleaseError::NotARepository(
                "bare repositories have no working tree".to_string(),
            ));
        }

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            gpg_program: "gpg".to_string(),
        }
    }

    /// Program used to look up secret keys
    pub fn with_gpg_program(mut self, program: impl Into<String>) -> Self {
        self.gpg_program = program.into();
        self
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::NotARepository("no working tree".to_string()))
    }

    /// Run `git` inside the working tree
    fn git(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .current_dir(self.workdir()?)
            .args(args)
            .output()?;
        Ok(output)
    }

    fn local_tags(&self) -> Result<Vec<(String, Oid)>> {
        let mut tags = Vec::new();
        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            if let (Some(name), Some(oid)) = (reference.name(), reference.target()) {
                tags.push((name.to_string(), oid));
            }
        }
        Ok(tags)
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        stderr
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::Git(git2::Error::from_str(
                "HEAD is detached; check out a branch first",
            )));
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("branch name is not UTF-8")))
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        let dirty = statuses
            .iter()
            .any(|entry| entry.status() != Status::CURRENT && !entry.status().is_ignored());

        Ok(dirty)
    }

    fn fetch_from_remote(&self, remote_name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::remote(format!("Remote '{}' not found", remote_name)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let user = username_from_url.unwrap_or("git");

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(user) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(user, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        // Remote branches land in refs/remotes/<remote>/*; existing local tags are never rewritten
        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = [refspec_heads.as_str(), "refs/tags/*:refs/tags/*"];
        let tags_before = self.local_tags()?;
        remote
            .fetch(&refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                ReleaseError::remote(format!("Failed to fetch from '{}': {}", remote_name, e))
            })?;

        for (name, oid) in tags_before {
            if self.repo.refname_to_id(&name).ok() != Some(oid) {
                debug!(tag = %name, "remote tag differs from local one, keeping local");
                self.repo.reference(&name, oid, true, "fetch: keep local tag")?;
            }
        }

        Ok(())
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self.head_commit()?.id())
    }

    fn upstream(&self, remote: &str, branch: &str) -> Result<(String, Oid)> {
        let tracked_prefix = format!("refs/remotes/{}/", remote);

        if let Ok(local) = self.repo.find_branch(branch, BranchType::Local) {
            if let Ok(upstream) = local.upstream() {
                let on_remote = upstream
                    .get()
                    .name()
                    .is_some_and(|name| name.starts_with(&tracked_prefix));

                if on_remote {
                    let name = upstream.name()?.unwrap_or(branch).to_string();
                    let oid = upstream.get().peel_to_commit()?.id();
                    return Ok((name, oid));
                }
                debug!(branch, remote, "configured upstream tracks another remote, ignoring it");
            }
        }

        let fallback = format!("refs/remotes/{}/{}", remote, branch);
        match self.repo.find_reference(&fallback) {
            Ok(reference) => {
                let oid = reference.peel_to_commit()?.id();
                Ok((format!("{}/{}", remote, branch), oid))
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                Err(ReleaseError::NoUpstream(branch.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn merge_base(&self, one: Oid, two: Oid) -> Result<Option<Oid>> {
        match self.repo.merge_base(one, two) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference
                    .peel(ObjectType::Any)
                    .map_err(|e| ReleaseError::tag(format!("Cannot peel tag: {}", e)))?
                    .id();

                Ok(Some(oid))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    fn commit_all(&self, message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        // Tracked files only; untracked files stay out of the release
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;
        let parent = self.head_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        debug!(%oid, "created release commit");
        Ok(oid)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.head_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn signing_key(&self) -> Result<Option<String>> {
        match self.repo.config()?.get_string("user.signingkey") {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn has_secret_key(&self, key: &str) -> bool {
        Command::new(&self.gpg_program)
            .args(["--list-secret-keys", key])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn create_signed_tag(&self, name: &str, message: &str, key: &str) -> Result<()> {
        let output = self.git(&["tag", "-s", "-u", key, "-m", message, name])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ReleaseError::tag(format!(
                "Cannot sign tag '{}': {}",
                name,
                stderr_of(&output)
            )))
        }
    }

    fn push_atomic(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        let branch_spec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        let tag_spec = format!("refs/tags/{0}:refs/tags/{0}", tag);

        let output = self.git(&["push", "--atomic", remote, &branch_spec, &tag_spec])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ReleaseError::remote(stderr_of(&output)))
        }
    }

    fn reset_hard(&self, oid: Oid) -> Result<()> {
        let object = self.repo.find_object(oid, None)?;
        self.repo.reset(&object, ResetType::Hard, None)?;
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| ReleaseError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }
}
