//! Main release workflow orchestration logic
//!
//! The workflow is a linear chain of phases, each returning early on failure:
//!
//! 1. Guards: version tool, branch, clean tree, remote sync
//! 2. Input: current version, bump class (prompted or preselected)
//! 3. Mutation: bump, re-read version, tag collision check, commit, tag
//! 4. Publish: confirmation, atomic push of branch + tag, rollback on failure
//!
//! Repository access, the version tool and operator input are all passed in,
//! so the same code runs against a real checkout or against mocks.

use git2::Oid;
use tracing::{debug, info, warn};

use crate::config::{Config, SigningConfig};
use crate::domain::{BumpClass, ReleasePlan, ReleaseVersion, RepositoryState, SyncSnapshot, SyncStatus};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui::{self, Prompter};
use crate::version::VersionTool;
use crate::warning::ReleaseWarning;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Stop after validation and report what would run
    pub dry_run: bool,

    /// Bump class given up front instead of prompting
    pub bump: Option<String>,
}

/// How a workflow run that did not fail ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Validation passed; nothing was changed
    DryRun { bump: BumpClass, command: String },

    /// Release commit and tag exist locally but the operator declined the push
    Declined {
        version: ReleaseVersion,
        tag: String,
        cleanup: [String; 2],
    },

    /// Commit and tag were pushed
    Published {
        version: ReleaseVersion,
        commit: String,
        tag: String,
        signed: bool,
    },
}

impl ReleaseOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseOutcome::DryRun { .. } | ReleaseOutcome::Published { .. } => 0,
            ReleaseOutcome::Declined { .. } => 1,
        }
    }
}

/// Main release workflow
///
/// # Arguments
///
/// * `args` - Dry-run flag and optional preselected bump class
/// * `config` - Release configuration
/// * `repo` - Repository to release from
/// * `tool` - Version manager owning the project version
/// * `prompter` - Source of operator input
///
/// # Returns
///
/// The outcome of the run, or the first error met. A failed push is rolled
/// back locally before its error is returned.
pub fn run_release_workflow<R, T>(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &R,
    tool: &T,
    prompter: &mut dyn Prompter,
) -> Result<ReleaseOutcome>
where
    R: Repository + ?Sized,
    T: VersionTool + ?Sized,
{
    check_preconditions(config, repo, tool)?;

    let current = tool.current_version()?;
    ui::display_current_version(&current);

    let bump = match &args.bump {
        Some(preselected) => BumpClass::parse(preselected)?,
        None => ui::prompt_bump_class(prompter, &current)?,
    };
    debug!(%bump, dry_run = args.dry_run, "bump class selected");

    if args.dry_run {
        let command = tool.bump_command(bump);
        ui::display_dry_run(&command);
        return Ok(ReleaseOutcome::DryRun { bump, command });
    }

    let pre_release_head = repo.head_oid()?;
    let (plan, commit, signed) = prepare_release(config, repo, tool, bump)?;

    let release = &config.release;
    ui::display_release_summary(&plan, signed, &release.remote, &release.branch);

    if !prompter.confirm(&format!("\nPush release to '{}'?", release.remote))? {
        let cleanup = plan.cleanup_commands();
        ui::display_cleanup_instructions(&cleanup);
        info!(tag = %plan.tag, "push declined, local release kept");
        return Ok(ReleaseOutcome::Declined {
            version: plan.version,
            tag: plan.tag,
            cleanup,
        });
    }

    publish(config, repo, &plan, pre_release_head)?;

    let commit = short_id(commit);
    ui::display_published(&plan.version, &commit, &plan.tag);

    Ok(ReleaseOutcome::Published {
        version: plan.version,
        commit,
        tag: plan.tag,
        signed,
    })
}

/// Guard chain run before anything is read from or written to the project.
///
/// Local state is captured once into a [RepositoryState]; remote sync is
/// captured once after fetching into a [SyncSnapshot].
pub fn check_preconditions<R, T>(config: &Config, repo: &R, tool: &T) -> Result<SyncStatus>
where
    R: Repository + ?Sized,
    T: VersionTool + ?Sized,
{
    if !tool.is_available() {
        return Err(ReleaseError::ToolNotFound(tool.program().to_string()));
    }

    let state = RepositoryState::new(repo.current_branch()?, !repo.has_uncommitted_changes()?);
    debug!(?state, "captured repository state");

    state.ensure_release_branch(&config.release.branch)?;
    state.ensure_clean()?;

    ui::display_status(&format!("Fetching from '{}'...", config.release.remote));
    repo.fetch_from_remote(&config.release.remote)?;

    let local = repo.head_oid()?;
    let (upstream_name, remote) = repo.upstream(&config.release.remote, &state.branch)?;
    let merge_base = repo.merge_base(local, remote)?.ok_or_else(|| ReleaseError::Diverged {
        branch: state.branch.clone(),
        upstream: upstream_name.clone(),
    })?;
    let snapshot = SyncSnapshot::new(local, remote, merge_base);
    debug!(?snapshot, upstream = %upstream_name, "captured sync state");

    let status = snapshot.ensure_publishable(&state.branch, &upstream_name)?;
    if status == SyncStatus::Ahead {
        ui::display_status(&format!(
            "'{}' is ahead of '{}'; those commits will be pushed with the release",
            state.branch, upstream_name
        ));
    }

    Ok(status)
}

/// Bump, commit and tag locally.
///
/// Returns the plan, the release commit and whether the tag is signed.
fn prepare_release<R, T>(
    config: &Config,
    repo: &R,
    tool: &T,
    bump: BumpClass,
) -> Result<(ReleasePlan, Oid, bool)>
where
    R: Repository + ?Sized,
    T: VersionTool + ?Sized,
{
    ui::display_status(&format!("Running: {}", tool.bump_command(bump)));
    tool.bump(bump)?;

    let version = tool.current_version()?;
    let plan = ReleasePlan::new(version, &config.release);
    info!(version = %plan.version, tag = %plan.tag, "version bumped");

    if repo.find_tag_oid(&plan.tag)?.is_some() {
        return Err(ReleaseError::TagExists(plan.tag));
    }

    let commit = repo.commit_all(&plan.commit_message)?;
    ui::display_success(&format!("Committed: {}", plan.commit_message));

    let signed = create_release_tag(repo, &plan, &config.signing)?;
    ui::display_success(&format!("Tagged: {}", plan.tag));

    Ok((plan, commit, signed))
}

/// Create the release tag, signed when possible.
///
/// Signing is best-effort: any signing failure is reported as a warning and
/// the tag is created unsigned instead.
fn create_release_tag<R>(repo: &R, plan: &ReleasePlan, signing: &SigningConfig) -> Result<bool>
where
    R: Repository + ?Sized,
{
    if signing.enabled {
        if let Some(key) = repo.signing_key()? {
            if repo.has_secret_key(&key) {
                match repo.create_signed_tag(&plan.tag, &plan.tag_message, &key) {
                    Ok(()) => {
                        info!(tag = %plan.tag, "created signed tag");
                        return Ok(true);
                    }
                    Err(e) => {
                        warn!(tag = %plan.tag, error = %e, "signing failed");
                        ui::display_warning(&ReleaseWarning::SigningFailed {
                            tag: plan.tag.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            } else {
                ui::display_warning(&ReleaseWarning::SecretKeyUnavailable { key });
            }
        }
    }

    repo.create_annotated_tag(&plan.tag, &plan.tag_message)?;
    info!(tag = %plan.tag, "created annotated tag");
    Ok(false)
}

/// Atomically push branch and tag, rolling back locally on failure.
fn publish<R>(config: &Config, repo: &R, plan: &ReleasePlan, pre_release_head: Oid) -> Result<()>
where
    R: Repository + ?Sized,
{
    let release = &config.release;
    ui::display_status(&format!(
        "Pushing {} and {} to '{}'",
        release.branch, plan.tag, release.remote
    ));

    match repo.push_atomic(&release.remote, &release.branch, &plan.tag) {
        Ok(()) => {
            info!(tag = %plan.tag, remote = %release.remote, "release pushed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "push failed, rolling back");
            Err(rollback(repo, plan, pre_release_head, e.to_string()))
        }
    }
}

/// Remove the local tag and release commit after a failed push.
///
/// Tag deletion is best-effort; the branch reset must succeed for the
/// rollback to count as complete.
fn rollback<R>(repo: &R, plan: &ReleasePlan, pre_release_head: Oid, reason: String) -> ReleaseError
where
    R: Repository + ?Sized,
{
    if let Err(e) = repo.delete_tag(&plan.tag) {
        ui::display_warning(&ReleaseWarning::TagDeleteFailed {
            tag: plan.tag.clone(),
            reason: e.to_string(),
        });
    }

    match repo.reset_hard(pre_release_head) {
        Ok(()) => {
            ui::display_rollback(&plan.tag);
            ReleaseError::PushFailed { reason }
        }
        Err(e) => ReleaseError::RollbackFailed {
            reason,
            rollback: format!(
                "{}; reset manually with: git reset --hard {}",
                e, pre_release_head
            ),
        },
    }
}

fn short_id(oid: Oid) -> String {
    let full = oid.to_string();
    full[..7.min(full.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_exit_codes() {
        let dry = ReleaseOutcome::DryRun {
            bump: BumpClass::Patch,
            command: "uv version --bump patch".to_string(),
        };
        assert_eq!(dry.exit_code(), 0);

        let declined = ReleaseOutcome::Declined {
            version: ReleaseVersion::parse("1.2.4").unwrap(),
            tag: "v1.2.4".to_string(),
            cleanup: ["a".to_string(), "b".to_string()],
        };
        assert_eq!(declined.exit_code(), 1);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id(MockRepository::oid(0xab)), "abababa");
    }
}
