// tests/workflow_test.rs
use git_release::cli::{run_release_workflow, ReleaseOutcome, ReleaseWorkflowArgs};
use git_release::config::Config;
use git_release::domain::BumpClass;
use git_release::git::MockRepository;
use git_release::ui::ScriptedPrompter;
use git_release::version::MockVersionTool;
use git_release::{ReleaseError, Result};

fn oid(n: u8) -> git2::Oid {
    MockRepository::oid(n)
}

fn interactive() -> ReleaseWorkflowArgs {
    ReleaseWorkflowArgs::default()
}

fn dry_run() -> ReleaseWorkflowArgs {
    ReleaseWorkflowArgs {
        dry_run: true,
        bump: None,
    }
}

fn patch_tool() -> MockVersionTool {
    MockVersionTool::new("1.2.3", "1.2.4")
}

fn run(
    args: &ReleaseWorkflowArgs,
    config: &Config,
    repo: &MockRepository,
    tool: &MockVersionTool,
    prompter: &mut ScriptedPrompter,
) -> Result<ReleaseOutcome> {
    run_release_workflow(args, config, repo, tool, prompter)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_patch_release_is_published() {
    let repo = MockRepository::new();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

    match &outcome {
        ReleaseOutcome::Published {
            version,
            commit,
            tag,
            signed,
        } => {
            assert_eq!(version.as_str(), "1.2.4");
            assert_eq!(tag, "v1.2.4");
            assert_eq!(commit.len(), 7);
            assert!(!signed);
        }
        other => panic!("expected a published release, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), 0);

    assert_eq!(tool.bumps(), vec![BumpClass::Patch]);
    assert_eq!(
        repo.operations(),
        vec![
            "fetch origin".to_string(),
            "commit chore: release 1.2.4".to_string(),
            "tag v1.2.4".to_string(),
            "push origin main v1.2.4".to_string(),
        ]
    );
    assert_eq!(repo.tags().get("v1.2.4"), Some(&repo.head()));
}

#[test]
fn test_declined_confirmation_keeps_local_release() {
    let repo = MockRepository::new();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "n"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

    match &outcome {
        ReleaseOutcome::Declined {
            version,
            tag,
            cleanup,
        } => {
            assert_eq!(version.as_str(), "1.2.4");
            assert_eq!(tag, "v1.2.4");
            assert_eq!(cleanup[0], "git reset --hard HEAD~1");
            assert_eq!(cleanup[1], "git tag -d v1.2.4");
        }
        other => panic!("expected a declined release, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), 1);

    assert!(repo.tags().contains_key("v1.2.4"));
    assert!(repo.performed("commit chore: release 1.2.4"));
    assert!(!repo.performed("push"));
    assert!(!repo.performed("reset"));
}

#[test]
fn test_only_single_y_confirms() {
    for answer in ["yes", "", "Yes", "ok"] {
        let repo = MockRepository::new();
        let tool = patch_tool();
        let mut prompter = ScriptedPrompter::new(["patch", answer]);

        let outcome =
            run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();
        assert!(
            matches!(outcome, ReleaseOutcome::Declined { .. }),
            "'{}' must not confirm the push",
            answer
        );
    }

    let repo = MockRepository::new();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "Y"]);
    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();
    assert!(matches!(outcome, ReleaseOutcome::Published { .. }));
}

#[test]
fn test_behind_remote_aborts_before_prompting() {
    let repo = MockRepository::new().with_sync(oid(1), oid(2), oid(1));
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::BehindRemote { .. }));
    assert!(prompter.asked().is_empty());
    assert_eq!(tool.reads(), 0);
    assert_eq!(repo.operations(), vec!["fetch origin".to_string()]);
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn test_diverged_history_aborts() {
    let repo = MockRepository::new().with_sync(oid(2), oid(3), oid(1));
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::Diverged { .. }));
    assert!(tool.bumps().is_empty());
}

#[test]
fn test_unrelated_history_is_reported_as_diverged() {
    let repo = MockRepository::new().with_unrelated_history(oid(2), oid(3));
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(
        matches!(err, ReleaseError::Diverged { ref branch, ref upstream }
            if branch == "main" && upstream == "origin/main"),
        "got {:?}",
        err
    );
    assert!(tool.bumps().is_empty());
    assert!(prompter.asked().is_empty());
}

#[test]
fn test_ahead_of_remote_proceeds() {
    let repo = MockRepository::new().with_sync(oid(2), oid(1), oid(1));
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();
    assert!(matches!(outcome, ReleaseOutcome::Published { .. }));
}

#[test]
fn test_dirty_tree_aborts_before_any_mutation() {
    let repo = MockRepository::new().with_dirty_tree();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::DirtyWorkingTree));
    assert!(tool.bumps().is_empty());
    assert!(repo.operations().is_empty());
    assert!(prompter.asked().is_empty());
}

#[test]
fn test_dirty_tree_aborts_in_dry_run_too() {
    let repo = MockRepository::new().with_dirty_tree();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch"]);

    let err = run(&dry_run(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();
    assert!(matches!(err, ReleaseError::DirtyWorkingTree));
}

#[test]
fn test_wrong_branch_aborts() {
    let repo = MockRepository::new().with_branch("feature/seeds");
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    match err {
        ReleaseError::WrongBranch { expected, actual } => {
            assert_eq!(expected, "main");
            assert_eq!(actual, "feature/seeds");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(repo.operations().is_empty());
}

#[test]
fn test_missing_version_tool_aborts_first() {
    let repo = MockRepository::new().with_branch("develop").with_dirty_tree();
    let tool = patch_tool().unavailable();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::ToolNotFound(ref program) if program == "uv"));
    assert!(repo.operations().is_empty());
}

#[test]
fn test_missing_upstream_aborts() {
    let repo = MockRepository::new().without_upstream();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();
    assert!(matches!(err, ReleaseError::NoUpstream(_)));
}

#[test]
fn test_fetch_failure_aborts() {
    let repo = MockRepository::new().with_failing_fetch();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();
    assert!(matches!(err, ReleaseError::Remote(_)));
    assert!(prompter.asked().is_empty());
}

// ============================================================================
// Bump class input
// ============================================================================

#[test]
fn test_invalid_bump_class_never_invokes_tool() {
    for input in ["", "Patch", "huge", "1.2.4", "pre", "release", "patch,minor"] {
        let repo = MockRepository::new();
        let tool = patch_tool();
        let mut prompter = ScriptedPrompter::new([input, "y"]);

        let err =
            run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

        assert!(
            matches!(err, ReleaseError::InvalidBumpClass(_)),
            "'{}' should be rejected, got {:?}",
            input,
            err
        );
        assert!(tool.bumps().is_empty());
        assert!(!repo.performed("commit"));
        assert!(!repo.performed("tag"));
    }
}

#[test]
fn test_invalid_bump_class_rejected_in_dry_run() {
    let repo = MockRepository::new();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["everything"]);

    let err = run(&dry_run(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();
    assert!(matches!(err, ReleaseError::InvalidBumpClass(_)));
}

#[test]
fn test_preselected_bump_skips_prompt() {
    let repo = MockRepository::new();
    let tool = MockVersionTool::new("1.2.3", "1.3.0");
    let args = ReleaseWorkflowArgs {
        dry_run: false,
        bump: Some("minor".to_string()),
    };
    let mut prompter = ScriptedPrompter::new(["y"]);

    let outcome = run(&args, &Config::default(), &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { ref tag, .. } if tag == "v1.3.0"));
    assert_eq!(tool.bumps(), vec![BumpClass::Minor]);
    assert_eq!(prompter.asked().len(), 1);
}

#[test]
fn test_invalid_preselected_bump_rejected() {
    let repo = MockRepository::new();
    let tool = patch_tool();
    let args = ReleaseWorkflowArgs {
        dry_run: false,
        bump: Some("MAJOR".to_string()),
    };
    let mut prompter = ScriptedPrompter::new(["y"]);

    let err = run(&args, &Config::default(), &repo, &tool, &mut prompter).unwrap_err();
    assert!(matches!(err, ReleaseError::InvalidBumpClass(_)));
    assert!(prompter.asked().is_empty());
}

// ============================================================================
// Dry run
// ============================================================================

#[test]
fn test_dry_run_never_mutates() {
    for class in BumpClass::ALL {
        let repo = MockRepository::new();
        let tool = patch_tool();
        let mut prompter = ScriptedPrompter::new([class.as_str()]);
        let head_before = repo.head();

        let outcome = run(&dry_run(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

        match &outcome {
            ReleaseOutcome::DryRun { bump, command } => {
                assert_eq!(*bump, class);
                assert_eq!(command, &format!("uv version --bump {}", class));
            }
            other => panic!("expected dry run, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 0);
        assert!(tool.bumps().is_empty());
        assert_eq!(repo.operations(), vec!["fetch origin".to_string()]);
        assert_eq!(repo.head(), head_before);
        assert!(repo.tags().is_empty());
    }
}

// ============================================================================
// Mutation failures
// ============================================================================

#[test]
fn test_existing_tag_aborts_before_commit() {
    let repo = MockRepository::new().with_tag("v1.2.4", oid(9));
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::TagExists(ref tag) if tag == "v1.2.4"));
    assert!(!repo.performed("commit"));
    assert_eq!(repo.tags().get("v1.2.4"), Some(&oid(9)));
    // the bump itself already ran and is left in place
    assert_eq!(tool.bumps(), vec![BumpClass::Patch]);
}

#[test]
fn test_failed_bump_aborts() {
    let repo = MockRepository::new();
    let tool = patch_tool().with_failing_bump();
    let mut prompter = ScriptedPrompter::new(["major", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::BumpFailed(_)));
    assert!(!repo.performed("commit"));
}

#[test]
fn test_unreadable_version_after_bump_aborts() {
    let repo = MockRepository::new();
    let tool = MockVersionTool::new("1.2.3", "");
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::EmptyVersion(_)));
    assert!(!repo.performed("commit"));
}

// ============================================================================
// Signing
// ============================================================================

#[test]
fn test_signed_tag_when_key_available() {
    let repo = MockRepository::new().with_signing_key("0xDEADBEEF", true);
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { signed: true, .. }));
    assert!(repo.performed("signed-tag v1.2.4 0xDEADBEEF"));
}

#[test]
fn test_signing_failure_falls_back_to_annotated_tag() {
    let repo = MockRepository::new()
        .with_signing_key("0xDEADBEEF", true)
        .with_failing_signing();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { signed: false, .. }));
    let ops = repo.operations();
    let failed = ops.iter().position(|op| op == "sign-failed v1.2.4").unwrap();
    let tagged = ops.iter().position(|op| op == "tag v1.2.4").unwrap();
    assert!(failed < tagged);
}

#[test]
fn test_key_without_secret_uses_annotated_tag() {
    let repo = MockRepository::new().with_signing_key("0xDEADBEEF", false);
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { signed: false, .. }));
    assert!(!repo.performed("signed-tag"));
    assert!(repo.performed("tag v1.2.4"));
}

#[test]
fn test_signing_disabled_in_config() {
    let repo = MockRepository::new().with_signing_key("0xDEADBEEF", true);
    let tool = patch_tool();
    let mut config = Config::default();
    config.signing.enabled = false;
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);

    let outcome = run(&interactive(), &config, &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { signed: false, .. }));
    assert!(!repo.performed("signed-tag"));
}

// ============================================================================
// Publish and rollback
// ============================================================================

#[test]
fn test_push_failure_restores_pre_release_state() {
    let repo = MockRepository::new()
        .with_tag("v1.2.3", oid(1))
        .with_failing_push("! [rejected] main -> main (fetch first)");
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);
    let head_before = repo.head();
    let tags_before = repo.tags();

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    match &err {
        ReleaseError::PushFailed { reason } => assert!(reason.contains("rejected")),
        other => panic!("expected push failure, got {:?}", other),
    }
    assert!(err.to_string().contains("remote was not modified"));
    assert_eq!(repo.head(), head_before);
    assert_eq!(repo.tags(), tags_before);
    assert!(repo.performed("delete-tag v1.2.4"));
}

#[test]
fn test_rollback_continues_when_tag_delete_fails() {
    let repo = MockRepository::new()
        .with_failing_push("network unreachable")
        .with_failing_tag_delete();
    let tool = patch_tool();
    let mut prompter = ScriptedPrompter::new(["patch", "y"]);
    let head_before = repo.head();

    let err = run(&interactive(), &Config::default(), &repo, &tool, &mut prompter).unwrap_err();

    assert!(matches!(err, ReleaseError::PushFailed { .. }));
    assert_eq!(repo.head(), head_before);
    assert!(repo.performed("reset"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_branch_remote_and_prefix() {
    let repo = MockRepository::new().with_branch("trunk");
    let tool = MockVersionTool::new("0.9.0", "1.0.0rc1");
    let mut config = Config::default();
    config.release.branch = "trunk".to_string();
    config.release.remote = "upstream".to_string();
    config.release.tag_prefix = "release-".to_string();
    let mut prompter = ScriptedPrompter::new(["rc", "y"]);

    let outcome = run(&interactive(), &config, &repo, &tool, &mut prompter).unwrap();

    assert!(matches!(outcome, ReleaseOutcome::Published { ref tag, .. } if tag == "release-1.0.0rc1"));
    assert!(repo.performed("fetch upstream"));
    assert!(repo.performed("push upstream trunk release-1.0.0rc1"));
}
