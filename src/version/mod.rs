//! Project version management
//!
//! The release never computes versions itself. It asks an external version
//! manager (by default `uv`) for the current version, asks it to apply a bump,
//! and reads the result back.
//!
//! - [command::CommandVersionTool]: runs the configured program as a subprocess
//! - [mock::MockVersionTool]: in-memory tool for tests

pub mod command;
pub mod mock;

pub use command::CommandVersionTool;
pub use mock::MockVersionTool;

use crate::domain::{BumpClass, ReleaseVersion};
use crate::error::Result;

/// Operations the release workflow needs from a version manager
pub trait VersionTool {
    /// Program name, used in messages
    fn program(&self) -> &str;

    /// Whether the program can be found on `PATH`
    fn is_available(&self) -> bool;

    /// Read the current version (short form)
    fn current_version(&self) -> Result<ReleaseVersion>;

    /// Apply a bump of the given class to the project manifest
    fn bump(&self, class: BumpClass) -> Result<()>;

    /// Human readable command a bump would run, shown in dry-run mode
    fn bump_command(&self, class: BumpClass) -> String {
        format!("{} version --bump {}", self.program(), class)
    }
}
