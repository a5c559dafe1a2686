use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use diffscout::config::Config;
use diffscout::diff::parse_diff;
use diffscout::git::GitHelper;
use diffscout::review::{GeminiClient, ReviewEngine};
use std::io::Read;

#[derive(Debug, Parser)]
#[command(name = "diffscout", version, about = "Git diff parsing and AI-assisted code review")]
struct Cli {
    /// Specify configuration file path
    #[arg(long, env = "DIFFSCOUT_CONFIG")]
    config: Option<String>,

    /// Log level
    #[arg(long, env = "DIFFSCOUT_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Args)]
struct DiffSource {
    /// Base ref to diff from; reads a raw diff from stdin when omitted
    #[arg(long)]
    base: Option<String>,

    /// Head ref to diff to
    #[arg(long, requires = "base")]
    head: Option<String>,

    /// Repository path for git invocations
    #[arg(long, default_value = ".")]
    repo: String,

    /// Limit the diff to these paths
    #[arg(long)]
    path: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Parse a diff into its structured line model and print it as JSON
    Parse {
        #[command(flatten)]
        source: DiffSource,
    },

    /// Run an AI review over a diff and print the report as JSON
    Review {
        #[command(flatten)]
        source: DiffSource,

        /// Free-text focus request forwarded to the reviewer prompt
        #[arg(long)]
        focus: Option<String>,

        /// Override the per-request token budget
        #[arg(long)]
        max_tokens: Option<usize>,
    },

    /// List local branches of a repository
    Branches {
        #[arg(long, default_value = ".")]
        repo: String,
    },
}

impl DiffSource {
    fn read(&self) -> anyhow::Result<String> {
        match (&self.base, &self.head) {
            (Some(base), Some(head)) => GitHelper::new(&self.repo)
                .diff_range(base, head, &self.path)
                .context("git diff failed"),
            (Some(base), None) => GitHelper::new(&self.repo)
                .diff_range(base, "HEAD", &self.path)
                .context("git diff failed"),
            _ => {
                let mut input = String::new();
                std::io::stdin()
                    .read_to_string(&mut input)
                    .context("failed to read diff from stdin")?;
                Ok(input)
            }
        }
    }
}

fn init_tracing(level: &str) {
    let level: tracing::Level = level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Parse { source } => {
            let files = parse_diff(&source.read()?);
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
        CliCommand::Review {
            source,
            focus,
            max_tokens,
        } => {
            let files = parse_diff(&source.read()?);

            let mut review_config = config.review.clone();
            if let Some(budget) = max_tokens {
                review_config.max_tokens_per_request = budget;
            }

            let client = GeminiClient::new(&config.api)?;
            let engine = ReviewEngine::new(&client, review_config);
            let report = engine.review(&files, focus.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CliCommand::Branches { repo } => {
            let branches = GitHelper::new(&repo).list_branches()?;
            println!("{}", serde_json::to_string_pretty(&branches)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_review_flags() {
        let cli = Cli::try_parse_from([
            "diffscout",
            "review",
            "--base",
            "main",
            "--head",
            "feature",
            "--focus",
            "error handling",
            "--max-tokens",
            "2048",
        ])
        .unwrap();

        match cli.command {
            CliCommand::Review {
                source,
                focus,
                max_tokens,
            } => {
                assert_eq!(source.base.as_deref(), Some("main"));
                assert_eq!(source.head.as_deref(), Some("feature"));
                assert_eq!(focus.as_deref(), Some("error handling"));
                assert_eq!(max_tokens, Some(2048));
            }
            _ => panic!("expected review command"),
        }
    }

    #[test]
    fn test_head_requires_base() {
        let result = Cli::try_parse_from(["diffscout", "parse", "--head", "feature"]);
        assert!(result.is_err());
    }
}
