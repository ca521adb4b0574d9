use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Mock repository for testing without actual git operations
///
/// Branch tips and tags are kept in memory. Every mutating call is appended
/// to an operation log so tests can assert what the workflow did, and
/// individual operations can be scripted to fail.
pub struct MockRepository {
    branch: String,
    dirty: bool,
    head: Cell<Oid>,
    upstream: Option<Oid>,
    merge_base: Option<Oid>,
    tags: RefCell<BTreeMap<String, Oid>>,
    signing_key: Option<String>,
    secret_key_available: bool,
    fail_fetch: bool,
    fail_signing: bool,
    fail_push: Option<String>,
    fail_tag_delete: bool,
    next_commit: Cell<u8>,
    operations: RefCell<Vec<String>>,
}

impl MockRepository {
    /// A clean `main` whose HEAD equals its upstream
    pub fn new() -> Self {
        let head = Self::oid(1);
        MockRepository {
            branch: "main".to_string(),
            dirty: false,
            head: Cell::new(head),
            upstream: Some(head),
            merge_base: Some(head),
            tags: RefCell::new(BTreeMap::new()),
            signing_key: None,
            secret_key_available: false,
            fail_fetch: false,
            fail_signing: false,
            fail_push: None,
            fail_tag_delete: false,
            next_commit: Cell::new(100),
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Deterministic OID built from a single byte
    pub fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_dirty_tree(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Set local HEAD, upstream tip and their merge base
    pub fn with_sync(mut self, local: Oid, remote: Oid, merge_base: Oid) -> Self {
        self.head = Cell::new(local);
        self.upstream = Some(remote);
        self.merge_base = Some(merge_base);
        self
    }

    /// Local and upstream tips with no common ancestor
    pub fn with_unrelated_history(mut self, local: Oid, remote: Oid) -> Self {
        self.head = Cell::new(local);
        self.upstream = Some(remote);
        self.merge_base = None;
        self
    }

    pub fn without_upstream(mut self) -> Self {
        self.upstream = None;
        self
    }

    /// Add a tag pointing to an OID
    pub fn with_tag(self, name: impl Into<String>, oid: Oid) -> Self {
        self.tags.borrow_mut().insert(name.into(), oid);
        self
    }

    pub fn with_signing_key(mut self, key: impl Into<String>, secret_available: bool) -> Self {
        self.signing_key = Some(key.into());
        self.secret_key_available = secret_available;
        self
    }

    pub fn with_failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn with_failing_signing(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    pub fn with_failing_push(mut self, reason: impl Into<String>) -> Self {
        self.fail_push = Some(reason.into());
        self
    }

    pub fn with_failing_tag_delete(mut self) -> Self {
        self.fail_tag_delete = true;
        self
    }

    /// Current HEAD
    pub fn head(&self) -> Oid {
        self.head.get()
    }

    /// Snapshot of all tags
    pub fn tags(&self) -> BTreeMap<String, Oid> {
        self.tags.borrow().clone()
    }

    /// Operations performed so far, in order (e.g. "commit chore: release 1.2.4")
    pub fn operations(&self) -> Vec<String> {
        self.operations.borrow().clone()
    }

    /// Whether any operation starting with `prefix` was recorded
    pub fn performed(&self, prefix: &str) -> bool {
        self.operations.borrow().iter().any(|op| op.starts_with(prefix))
    }

    fn record(&self, operation: String) {
        self.operations.borrow_mut().push(operation);
    }

    fn insert_tag(&self, name: &str) -> Result<()> {
        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        tags.insert(name.to_string(), self.head.get());
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn fetch_from_remote(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {}", remote));
        if self.fail_fetch {
            return Err(ReleaseError::remote(format!(
                "Failed to fetch from '{}': unreachable",
                remote
            )));
        }
        Ok(())
    }

    fn head_oid(&self) -> Result<Oid> {
        Ok(self.head.get())
    }

    fn upstream(&self, remote: &str, branch: &str) -> Result<(String, Oid)> {
        self.upstream
            .map(|oid| (format!("{}/{}", remote, branch), oid))
            .ok_or_else(|| ReleaseError::NoUpstream(branch.to_string()))
    }

    fn merge_base(&self, _one: Oid, _two: Oid) -> Result<Option<Oid>> {
        Ok(self.merge_base)
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.borrow().get(tag_name).copied())
    }

    fn commit_all(&self, message: &str) -> Result<Oid> {
        let n = self.next_commit.get();
        self.next_commit.set(n.wrapping_add(1));
        let oid = Self::oid(n);
        self.head.set(oid);
        self.record(format!("commit {}", message));
        Ok(oid)
    }

    fn create_annotated_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.insert_tag(name)?;
        self.record(format!("tag {}", name));
        Ok(())
    }

    fn signing_key(&self) -> Result<Option<String>> {
        Ok(self.signing_key.clone())
    }

    fn has_secret_key(&self, key: &str) -> bool {
        self.signing_key.as_deref() == Some(key) && self.secret_key_available
    }

    fn create_signed_tag(&self, name: &str, _message: &str, key: &str) -> Result<()> {
        if self.fail_signing {
            self.record(format!("sign-failed {}", name));
            return Err(ReleaseError::tag(format!(
                "Cannot sign tag '{}': gpg failed to sign the data",
                name
            )));
        }
        self.insert_tag(name)?;
        self.record(format!("signed-tag {} {}", name, key));
        Ok(())
    }

    fn push_atomic(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        self.record(format!("push {} {} {}", remote, branch, tag));
        match &self.fail_push {
            Some(reason) => Err(ReleaseError::remote(reason.clone())),
            None => Ok(()),
        }
    }

    fn reset_hard(&self, oid: Oid) -> Result<()> {
        self.head.set(oid);
        self.record(format!("reset {}", oid));
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.record(format!("delete-tag {}", name));
        if self.fail_tag_delete {
            return Err(ReleaseError::tag(format!("Cannot delete tag '{}'", name)));
        }
        self.tags.borrow_mut().remove(name);
        Ok(())
    }
}
