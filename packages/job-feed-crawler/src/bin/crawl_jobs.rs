//! Crawl the job feeds once and write the raw CSV.

use anyhow::{Context, Result};
use clap::Parser;
use job_feed_crawler::{
    CrawlConfig, CrawlOrchestrator, CsvSink, HttpFeedFetcher, RecordSink, RobotsPolicyGate,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crawl-jobs")]
#[command(about = "Collect job postings from the per-category JSON feeds")]
struct Cli {
    /// Unique records to collect before stopping (overrides JOB_CRAWLER_TARGET)
    #[arg(long)]
    target: Option<usize>,
}

impl Cli {
    /// Flags override whatever the environment and `.env` configured.
    fn apply(&self, config: CrawlConfig) -> CrawlConfig {
        match self.target {
            Some(target) => config.with_target(target),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,job_feed_crawler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = cli.apply(CrawlConfig::from_env().context("Failed to load configuration")?);
    tracing::info!(
        base_url = %config.base_url,
        target = config.target,
        categories = config.categories.len(),
        output = %config.output_path.display(),
        "Configuration loaded"
    );

    let fetcher = HttpFeedFetcher::from_config(&config).context("Failed to build HTTP client")?;
    let base_url = Url::parse(&config.base_url).context("Invalid base URL")?;
    let gate = RobotsPolicyGate::load(fetcher.client(), &base_url, &config.user_agent).await;

    let orchestrator = CrawlOrchestrator::new(config.clone(), fetcher, gate)
        .context("Failed to set up crawl")?;
    let outcome = orchestrator.run().await;

    if outcome.records.is_empty() {
        tracing::warn!("Crawl finished without collecting any jobs");
    }

    let sink = CsvSink::new(&config.output_path);
    match sink.write(&outcome.records) {
        Ok(rows) => {
            tracing::info!(
                collected = outcome.records.len(),
                rows,
                path = %sink.path().display(),
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                collected = outcome.records.len(),
                error = %e,
                "Failed to save jobs; collected records were not persisted"
            );
            Err(e).context("Failed to save jobs")
        }
    }
}
