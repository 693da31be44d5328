use anyhow::{Context, Result};
use rust_i18n::t;

use quizharvest::config::Config;
use quizharvest::crawler::{fetch_links, HttpFetcher};
use quizharvest::parser::{QuestionExtractor, QuestionPreview};
use quizharvest::storage::{ProgressStore, SqliteProgressStore};

pub async fn links(config: &Config) -> Result<()> {
    let fetcher =
        HttpFetcher::from_config(&config.source).context("Failed to create fetcher")?;
    let store = SqliteProgressStore::new(&config.store.sqlite_path)?;
    let processed = store.load_processed_urls()?;

    let links = fetch_links(&fetcher, &config.source.listing_url).await;

    println!("{}", t!("cli.links.header", count = links.len()));
    for link in &links {
        let status = if processed.contains(&link.url) {
            t!("cli.links.processed")
        } else {
            t!("cli.links.new")
        };
        println!("{:>4}. [{status}] {}", link.position, link.url);
    }

    Ok(())
}

pub async fn extract(config: &Config, url: &str) -> Result<()> {
    let fetcher =
        HttpFetcher::from_config(&config.source).context("Failed to create fetcher")?;

    let html = fetcher
        .fetch_page(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    let extraction = QuestionExtractor::new()
        .extract(&html)
        .with_context(|| format!("Failed to extract questions from {url}"))?;

    for skipped in &extraction.skipped {
        eprintln!("skipped block {}: {}", skipped.position, skipped.reason);
    }

    let previews: Vec<QuestionPreview<'_>> =
        extraction.questions.iter().map(QuestionPreview::from).collect();
    println!("{}", serde_json::to_string_pretty(&previews)?);

    Ok(())
}

pub fn stats(config: &Config) -> Result<()> {
    let database = &config.store.sqlite_path;
    if !database.exists() {
        println!("Database not found: {}", database.display());
        println!("Run a harvest first to create the database.");
        return Ok(());
    }

    let store = SqliteProgressStore::new(database)?;
    let stats = store.stats()?;

    println!("{}", t!("cli.stats.header"));
    println!("================");
    println!("Database: {}", database.display());
    println!();
    println!("{}: {}", t!("cli.stats.processed_links"), stats.processed_links);
    println!("{}: {}", t!("cli.stats.counter"), stats.counter);
    let last = stats
        .last_processed_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| t!("cli.stats.never").to_string());
    println!("{}: {last}", t!("cli.stats.last_processed"));

    Ok(())
}
