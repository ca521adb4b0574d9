use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs};
use git_release::config;
use git_release::git::Git2Repository;
use git_release::ui::{self, TerminalPrompter};
use git_release::version::CommandVersionTool;

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump the project version, then commit, tag and atomically push the release"
)]
struct Args {
    #[arg(long, help = "Validate and show the bump command without changing anything")]
    dry_run: bool,

    #[arg(
        short,
        long,
        value_name = "TYPE",
        help = "Bump type (major, minor, patch, stable, alpha, beta, rc, post, dev); prompts if omitted"
    )]
    bump: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Log debug details to stderr")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "git_release=debug"
    } else {
        "git_release=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo.with_gpg_program(config.signing.gpg_program.clone()),
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let tool = CommandVersionTool::new(config.version_tool.program.clone());
    let workflow_args = ReleaseWorkflowArgs {
        dry_run: args.dry_run,
        bump: args.bump,
    };

    match run_release_workflow(
        &workflow_args,
        &config,
        &repo,
        &tool,
        &mut TerminalPrompter,
    ) {
        Ok(outcome) => {
            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            tracing::debug!(category = ?e.category(), "release aborted");
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
