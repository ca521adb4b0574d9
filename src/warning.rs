use std::fmt;

/// Non-fatal conditions met during a release.
/// These are reported to the operator but never stop the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// A signing key is configured but its secret key is not in the keyring
    SecretKeyUnavailable { key: String },
    /// Signing the tag failed; an unsigned annotated tag is used instead
    SigningFailed { tag: String, reason: String },
    /// Deleting the local tag during rollback failed
    TagDeleteFailed { tag: String, reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::SecretKeyUnavailable { key } => {
                write!(
                    f,
                    "Signing key '{}' has no secret key in the keyring; creating an unsigned tag",
                    key
                )
            }
            ReleaseWarning::SigningFailed { tag, reason } => {
                write!(
                    f,
                    "Could not sign tag '{}' ({}); falling back to an unsigned annotated tag",
                    tag, reason
                )
            }
            ReleaseWarning::TagDeleteFailed { tag, reason } => {
                write!(
                    f,
                    "Could not delete local tag '{}' ({}); remove it with: git tag -d {}",
                    tag, reason, tag
                )
            }
        }
    }
}
