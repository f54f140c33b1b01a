use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagescout::{resolve_projects, write_snapshot, ApiClient, Config, GitHubClient, SnapshotOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    info!("Starting pagescout v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    if config.token.is_none() {
        warn!("GITHUB_TOKEN is not set; requests are unauthenticated and rate-limited harder");
    }

    let github = GitHubClient::new(ApiClient::new(config.token.as_deref())?);
    let mut entries = resolve_projects(&config, &github).await?;

    match write_snapshot(&mut entries, &config.output_path)? {
        SnapshotOutcome::Unchanged => {
            println!("No changes in {}", config.output_path.display());
        }
        SnapshotOutcome::Written(count) => {
            println!(
                "Wrote {} with {} projects.",
                config.output_path.display(),
                count
            );
        }
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` overrides the default info level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
