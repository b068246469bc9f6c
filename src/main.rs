use anyhow::{anyhow, Context, Result};
use console::Term;
use std::io::Write;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};
use wflint::cli::commands::LintCommand;
use wflint::cli::output::{create_spinner, display_url, format_error, format_summary};
use wflint::cli::{browser, prompt, Cli, Command, WorkflowCommand};
use wflint::{ActionlintEngine, AppConfig, GitHubClient, LintPipeline, RemoteClientConfig, RepoRef};

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow!("interrupted")),
    };

    if let Err(e) = result {
        if let Err(flush_err) = std::io::stdout().flush() {
            debug!("failed to flush stdout: {}", flush_err);
        }
        eprintln!("{}", format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries only problem lines
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to set logging subscriber: {}", e))
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.apply_env();
    config.validate().context("Invalid configuration")?;

    match &cli.command {
        Command::Workflow(WorkflowCommand::Lint(cmd)) => lint_workflow(cmd, &config).await,
    }
}

async fn lint_workflow(cmd: &LintCommand, config: &AppConfig) -> Result<()> {
    let can_prompt = prompt::can_prompt();
    let request = cmd.to_request(can_prompt).map_err(|e| anyhow!(e))?;

    let repo = base_repo(cmd, config)
        .await
        .context("could not determine base repo")?;
    debug!("base repo: {}", repo);

    let client = GitHubClient::new(RemoteClientConfig::from_app_config(config, repo.clone()))
        .context("could not build http client")?;
    let engine = ActionlintEngine::from_config(&config.actionlint);

    let mut pipeline = LintPipeline::new(client, engine);
    if request.interactive {
        pipeline = pipeline.with_chooser(Box::new(prompt::DialoguerChooser::new()));
    }

    if cmd.web {
        let (workflow, git_ref) = pipeline.locate(&request, cmd.yaml).await?;
        let url = browser::workflow_url(&repo, &workflow, git_ref.as_deref());
        if Term::stdout().is_term() {
            println!("Opening {} in your browser.", display_url(&url));
        }
        return browser::open(&url).await;
    }

    // The chooser needs the terminal to itself
    let outcome = if request.interactive {
        pipeline.check(&request).await
    } else {
        let spinner = create_spinner("Fetching and linting workflow");
        let outcome = pipeline.check(&request).await;
        spinner.finish_and_clear();
        outcome
    }?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline.report(&outcome, &mut out)?;

    if Term::stderr().is_term() {
        eprintln!("{}", format_summary(&outcome));
    }
    Ok(())
}

/// `--repo`/`GH_REPO` first, then the git origin remote
async fn base_repo(cmd: &LintCommand, config: &AppConfig) -> Result<RepoRef> {
    match &cmd.repo {
        Some(spec) => RepoRef::parse(spec, &config.host),
        None => RepoRef::from_git_origin().await,
    }
}
