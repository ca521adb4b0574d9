use crate::domain::{BumpClass, ReleaseVersion};
use crate::error::{ReleaseError, Result};
use crate::version::VersionTool;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::{debug, info};

/// Version tool driven through its command line
///
/// Expects the `uv version` interface: `version --short` prints the version,
/// `version --bump <class>` rewrites the manifest.
pub struct CommandVersionTool {
    program: String,
    working_dir: Option<PathBuf>,
}

impl CommandVersionTool {
    pub fn new(program: impl Into<String>) -> Self {
        CommandVersionTool {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Run the tool from `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(program = %self.program, ?args, "running version tool");
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd.output()?)
    }
}

fn describe_failure(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match output.status.code() {
        Some(code) if stderr.is_empty() => format!("exit code {}", code),
        Some(code) => format!("exit code {}: {}", code, stderr),
        None => "terminated by signal".to_string(),
    }
}

impl VersionTool for CommandVersionTool {
    fn program(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn current_version(&self) -> Result<ReleaseVersion> {
        let output = self.run(&["version", "--short"])?;
        if !output.status.success() {
            return Err(ReleaseError::EmptyVersion(format!(
                "`{} version --short` failed with {}",
                self.program,
                describe_failure(&output)
            )));
        }

        ReleaseVersion::parse(&String::from_utf8_lossy(&output.stdout))
    }

    fn bump(&self, class: BumpClass) -> Result<()> {
        let output = self.run(&["version", "--bump", class.as_str()])?;
        if !output.status.success() {
            return Err(ReleaseError::BumpFailed(format!(
                "`{}` failed with {}",
                self.bump_command(class),
                describe_failure(&output)
            )));
        }

        info!(class = %class, "version bumped");
        Ok(())
    }
}
