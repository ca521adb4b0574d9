//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations a release needs, allowing the workflow to run against a real
//! repository or an in-memory mock.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate, shelling
//!   out to the `git` executable for signed tags and atomic pushes
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let branch = repo.current_branch()?;
//! let dirty = repo.has_uncommitted_changes()?;
//! println!("{} (dirty: {})", branch, dirty);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Version-control operations used by the release workflow
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying
/// errors (like `git2::Error` or a failed `git` process) to the appropriate
/// [crate::error::ReleaseError] variants.
pub trait Repository {
    /// Name of the branch HEAD points at
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g., "main")
    /// * `Err` - If HEAD is detached or unreadable
    fn current_branch(&self) -> Result<String>;

    /// Whether tracked files have staged or unstaged modifications
    ///
    /// Untracked files are ignored.
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Fetch all branches and tags from a remote
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    fn fetch_from_remote(&self, remote: &str) -> Result<()>;

    /// OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Resolve the remote tracking branch of `branch`
    ///
    /// Uses the configured upstream when it lives on `remote`, otherwise
    /// `refs/remotes/<remote>/<branch>`.
    ///
    /// # Returns
    /// * `Ok((name, oid))` - Upstream short name (e.g., "origin/main") and its OID
    /// * `Err(ReleaseError::NoUpstream)` - If neither exists
    fn upstream(&self, remote: &str, branch: &str) -> Result<(String, Oid)>;

    /// Most recent common ancestor of two commits
    ///
    /// `None` when the histories share no commit.
    fn merge_base(&self, one: Oid, two: Oid) -> Result<Option<Oid>>;

    /// Find a tag by name and get the OID it points at
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - If the tag exists
    /// * `Ok(None)` - If the tag doesn't exist
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Stage changes to tracked files and commit them on the current branch
    ///
    /// Untracked files are left out of the commit.
    ///
    /// # Returns
    /// * `Ok(Oid)` - The new commit
    fn commit_all(&self, message: &str) -> Result<Oid>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Signing key configured for this repository, if any (`user.signingkey`)
    fn signing_key(&self) -> Result<Option<String>>;

    /// Whether the secret half of `key` is available in the keyring
    fn has_secret_key(&self, key: &str) -> bool;

    /// Create a cryptographically signed tag on HEAD
    fn create_signed_tag(&self, name: &str, message: &str, key: &str) -> Result<()>;

    /// Push a branch and a tag in one all-or-nothing operation
    fn push_atomic(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;

    /// Move the current branch, index and working tree to `oid`
    fn reset_hard(&self, oid: Oid) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;
}
