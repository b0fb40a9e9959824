use anstream::{eprintln, println};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use token_check::progress::StepProgress;
use token_check::{Cli, Config, Credentials, GitHubProvider, Inspection, Inspector, RepoSlug};
use tracing::Level;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let mut cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = Config::load()?;

    if cli.token.is_none()
        && let Some(token) = config.read_token()
    {
        cli.token = Some(token);
    }

    let slug = RepoSlug::parse(&cli.repository)?;
    let credentials = Credentials::new(
        &slug.owner,
        &slug.repo,
        cli.token.as_deref().unwrap_or_default(),
    )?;

    let inspector = Inspector::new(GitHubProvider::from_config(&config)?);
    let progress = StepProgress::new(cli.quiet > 0 || cli.no_progress || cli.json);
    progress.set_step(format!("Checking access to {}", credentials.full_name()));

    let run = async {
        let mut inspection = inspector.inspect(&credentials).await;

        if let Some(branch) = cli.branch.as_deref()
            && inspection.is_granted()
        {
            progress.set_step(format!("Listing files on {branch}"));
            let listing = inspector.browse(&credentials, branch).await;
            inspection = inspection.with_listing(branch, listing);
        }

        inspection
    };

    // Nothing is held between calls, so dropping the in-flight future is safe.
    let inspection = tokio::select! {
        biased;

        _ = tokio::signal::ctrl_c() => {
            progress.abandon();
            eprintln!("{}: cancelled", "warning".yellow().bold());
            return Ok(ExitCode::from(130));
        }

        inspection = run => inspection,
    };
    progress.finish();

    if cli.json {
        let json = serde_json::to_string_pretty(&inspection).into_diagnostic()?;
        println!("{json}");
    } else if cli.quiet < 2 {
        render(&inspection, cli.quiet == 0, cli.verbose > 0);
    }

    Ok(if inspection.is_granted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: u8, quiet: u8) {
    if quiet > 1 {
        return;
    }

    let level = match verbose {
        _ if quiet > 0 => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn render(inspection: &Inspection, listing: bool, show_repository: bool) {
    let message = inspection.message();
    let mut lines = message.lines();

    if let Some(status) = lines.next() {
        if inspection.is_granted() {
            println!("{} {}", "✓".green().bold(), status.bold());
        } else {
            println!("{} {}", "✗".red().bold(), status.bold());
        }
    }

    for line in lines {
        match line.strip_prefix("warning: ") {
            Some(warning) => eprintln!("{}: {warning}", "warning".yellow().bold()),
            None => println!("  {line}"),
        }
    }

    if !listing {
        return;
    }

    if show_repository && let Some(document) = inspection.repository_info() {
        println!();
        println!("{}", "Repository".bold().underline());
        println!("{}", document.pretty());
    }

    if let Some(branches) = &inspection.branches {
        println!();
        println!("{}", "Branches".bold().underline());
        for name in branches.names() {
            if inspection.selected_branch.as_deref() == Some(name.as_str()) {
                println!("* {}", name.green());
            } else {
                println!("  {name}");
            }
        }
    }

    if let Some(files) = &inspection.files {
        println!();
        println!("{}", "Files".bold().underline());
        for path in &files.paths {
            println!("  {path}");
        }
    }
}
