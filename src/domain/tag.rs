use crate::config::ReleaseConfig;
use crate::domain::version::ReleaseVersion;

/// Everything recorded for one release, derived from the bumped version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub version: ReleaseVersion,
    pub tag: String,
    pub commit_message: String,
    pub tag_message: String,
}

impl ReleasePlan {
    /// Derive tag name and messages deterministically from the version
    ///
    /// Example: prefix "v", version "1.2.4" -> tag "v1.2.4", commit "chore: release 1.2.4"
    pub fn new(version: ReleaseVersion, config: &ReleaseConfig) -> Self {
        let tag = format!("{}{}", config.tag_prefix, version);
        let commit_message = render(&config.commit_message, &version);
        let tag_message = render(&config.tag_message, &version);

        ReleasePlan {
            version,
            tag,
            commit_message,
            tag_message,
        }
    }

    /// Commands that undo a locally created, unpublished release
    pub fn cleanup_commands(&self) -> [String; 2] {
        [
            "git reset --hard HEAD~1".to_string(),
            format!("git tag -d {}", self.tag),
        ]
    }
}

fn render(template: &str, version: &ReleaseVersion) -> String {
    template.replace("{version}", version.as_str())
}
