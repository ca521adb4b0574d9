use thiserror::Error;

/// Broad class of a release failure, used to decide how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The execution environment cannot run a release at all
    Environment,
    /// The repository is not in a releasable state
    Precondition,
    /// Operator input or tool output was not usable
    Input,
    /// The release would collide with an existing one
    Collision,
    /// Publishing to the remote failed
    Publish,
    /// Unexpected failure of an underlying library or tool
    Internal,
}

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Version tool not found: '{0}' is not on PATH")]
    ToolNotFound(String),

    #[error("Releases are only allowed from '{expected}', current branch is '{actual}'")]
    WrongBranch { expected: String, actual: String },

    #[error("Working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    #[error("No upstream tracking branch for '{0}'")]
    NoUpstream(String),

    #[error("Local '{branch}' is behind '{upstream}'; pull before releasing")]
    BehindRemote { branch: String, upstream: String },

    #[error("Local '{branch}' and '{upstream}' have diverged; reconcile the histories first")]
    Diverged { branch: String, upstream: String },

    #[error("Invalid bump type '{0}' (expected one of: major, minor, patch, stable, alpha, beta, rc, post, dev)")]
    InvalidBumpClass(String),

    #[error("Version bump failed: {0}")]
    BumpFailed(String),

    #[error("Could not read the new version: {0}")]
    EmptyVersion(String),

    #[error("Tag '{0}' already exists; bumped files were left on disk (restore with: git checkout -- .)")]
    TagExists(String),

    #[error("Push failed: {reason}. Local release commit and tag were rolled back; the remote was not modified")]
    PushFailed { reason: String },

    #[error("Push failed: {reason}. Rollback also failed: {rollback}")]
    RollbackFailed { reason: String, rollback: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ReleaseError::NotARepository(_) | ReleaseError::ToolNotFound(_) => {
                ErrorCategory::Environment
            }
            ReleaseError::WrongBranch { .. }
            | ReleaseError::DirtyWorkingTree
            | ReleaseError::NoUpstream(_)
            | ReleaseError::BehindRemote { .. }
            | ReleaseError::Diverged { .. } => ErrorCategory::Precondition,
            ReleaseError::InvalidBumpClass(_)
            | ReleaseError::BumpFailed(_)
            | ReleaseError::EmptyVersion(_)
            | ReleaseError::Config(_) => ErrorCategory::Input,
            ReleaseError::TagExists(_) => ErrorCategory::Collision,
            ReleaseError::PushFailed { .. }
            | ReleaseError::RollbackFailed { .. }
            | ReleaseError::Remote(_) => ErrorCategory::Publish,
            ReleaseError::Git(_) | ReleaseError::Tag(_) | ReleaseError::Io(_) => {
                ErrorCategory::Internal
            }
        }
    }
}
