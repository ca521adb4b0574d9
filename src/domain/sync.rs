use git2::Oid;

use crate::error::{ReleaseError, Result};

/// Position of local HEAD relative to its remote tracking branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    UpToDate,
    /// Local has commits the remote does not; pushing will fast-forward it
    Ahead,
    Behind,
    Diverged,
}

/// Refs resolved right after fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub local: Oid,
    pub remote: Oid,
    pub merge_base: Oid,
}

impl SyncSnapshot {
    pub fn new(local: Oid, remote: Oid, merge_base: Oid) -> Self {
        SyncSnapshot {
            local,
            remote,
            merge_base,
        }
    }

    /// Three-way comparison through the merge base
    pub fn status(&self) -> SyncStatus {
        if self.local == self.remote {
            SyncStatus::UpToDate
        } else if self.local == self.merge_base {
            SyncStatus::Behind
        } else if self.remote == self.merge_base {
            SyncStatus::Ahead
        } else {
            SyncStatus::Diverged
        }
    }

    /// Fails when local is behind or has diverged
    pub fn ensure_publishable(&self, branch: &str, upstream: &str) -> Result<SyncStatus> {
        match self.status() {
            SyncStatus::Behind => Err(ReleaseError::BehindRemote {
                branch: branch.to_string(),
                upstream: upstream.to_string(),
            }),
            SyncStatus::Diverged => Err(ReleaseError::Diverged {
                branch: branch.to_string(),
                upstream: upstream.to_string(),
            }),
            status => Ok(status),
        }
    }
}
