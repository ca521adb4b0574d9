use crate::error::{ReleaseError, Result};

/// Local repository state captured once before the guards run
///
/// The workflow never re-queries branch or working tree status after this
/// snapshot; every guard reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    pub branch: String,
    pub is_clean: bool,
}

impl RepositoryState {
    pub fn new(branch: impl Into<String>, is_clean: bool) -> Self {
        RepositoryState {
            branch: branch.into(),
            is_clean,
        }
    }

    /// Releases are only cut from the configured release branch
    pub fn ensure_release_branch(&self, release_branch: &str) -> Result<()> {
        if self.branch == release_branch {
            Ok(())
        } else {
            Err(ReleaseError::WrongBranch {
                expected: release_branch.to_string(),
                actual: self.branch.clone(),
            })
        }
    }

    pub fn ensure_clean(&self) -> Result<()> {
        if self.is_clean {
            Ok(())
        } else {
            Err(ReleaseError::DirtyWorkingTree)
        }
    }
}
