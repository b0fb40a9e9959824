use clap::builder::styling::{AnsiColor, Color, Style};
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "token-check",
    version,
    about = "Check whether a GitHub token can read a repository",
    long_about = "Token-Check verifies that a GitHub personal access token has read access to a repository, then lists its branches and the files of the default branch"
)]
#[command(styles = get_styles())]
pub struct Cli {
    /// Repository to check
    ///
    /// Example: owner/repo or https://github.com/owner/repo
    #[arg(value_name = "REPOSITORY")]
    pub repository: String,

    /// GitHub personal access token
    ///
    /// Can also be set via GITHUB_TOKEN environment variable.
    /// Falls back to the token file named in the config.
    #[arg(long, env = "GITHUB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Branch to list files from after the initial listing
    ///
    /// Only the file listing is repeated, the access check is not.
    #[arg(long, short = 'b', value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Print the inspection as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Use verbose output
    ///
    /// Use multiple times for more verbosity (e.g., -vv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Use quiet output
    ///
    /// Use multiple times for less output (e.g., -qq for silent)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
