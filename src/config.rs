use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Name of the project-local configuration file.
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// Represents the complete configuration for git-release.
///
/// Contains release branch and naming settings, the version tool to drive and signing options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub version_tool: VersionToolConfig,

    #[serde(default)]
    pub signing: SigningConfig,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_commit_message() -> String {
    "chore: release {version}".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

fn default_program() -> String {
    "uv".to_string()
}

fn default_gpg_program() -> String {
    "gpg".to_string()
}

fn default_true() -> bool {
    true
}

/// Where and how a release is recorded.
///
/// `commit_message` and `tag_message` accept a `{version}` placeholder.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            branch: default_branch(),
            remote: default_remote(),
            tag_prefix: default_tag_prefix(),
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
        }
    }
}

/// External program that owns the project version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionToolConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for VersionToolConfig {
    fn default() -> Self {
        VersionToolConfig {
            program: default_program(),
        }
    }
}

/// Tag signing options. Signing is always best-effort.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SigningConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_gpg_program")]
    pub gpg_program: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        SigningConfig {
            enabled: true,
            gpg_program: default_gpg_program(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let local = Path::new(CONFIG_FILE_NAME);
    if local.exists() {
        return read_config(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_config.exists() {
            return read_config(&user_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| ReleaseError::config(format!("Cannot parse '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[release]
remote = "upstream"
"#,
        )
        .unwrap();

        assert_eq!(config.release.remote, "upstream");
        assert_eq!(config.release.branch, "main");
        assert_eq!(config.version_tool.program, "uv");
        assert!(config.signing.enabled);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_config(Some("/nonexistent/release.toml")).unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
    }
}
