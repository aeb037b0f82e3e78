//! git-request-list - list open pull and merge requests across GitHub and GitLab.

use std::path::PathBuf;

use clap::Parser;
use gitreq_core::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "git-request-list")]
#[command(author, version, about = "List open pull/merge requests from GitHub and GitLab", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (default: user config dir, then /etc/git-request-list.yml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("warn,gitreq_core=debug,gitreq_cli=debug,gitreq_github=debug,gitreq_gitlab=debug,gitreq_format=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load_from(&path)?;

    let output = gitreq_cli::run(&config).await?;
    print!("{}", output);

    Ok(())
}
