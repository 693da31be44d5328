use anyhow::{Context, Result};
use rust_i18n::t;
use std::sync::Arc;

use quizharvest::config::Config;
use quizharvest::crawler::{HttpFetcher, QuizPipeline};
use quizharvest::delivery::TelegramChannel;
use quizharvest::models::{RunOutcome, RunReport};
use quizharvest::publisher::DocumentPublisher;
use quizharvest::render::DocumentRenderer;
use quizharvest::storage::create_sqlite_store;
use quizharvest::translate::{GoogleTranslator, PassthroughTranslator, Translator};

pub async fn run(config: &Config) -> Result<()> {
    println!("{}", t!("cli.run.starting"));

    // Credentials are checked before any link is consumed
    let channel = TelegramChannel::new(config.telegram_config()?)
        .context("Failed to create Telegram channel")?;

    let fetcher =
        HttpFetcher::from_config(&config.source).context("Failed to create fetcher")?;

    let store = create_sqlite_store(&config.store.sqlite_path).with_context(|| {
        format!(
            "Failed to open progress store: {}",
            config.store.sqlite_path.display()
        )
    })?;

    let translator: Arc<dyn Translator> = if config.translation.enabled {
        Arc::new(
            GoogleTranslator::new(&config.translation)
                .context("Failed to create translator")?,
        )
    } else {
        Arc::new(PassthroughTranslator)
    };

    let language = config.translation.target_language.as_str();
    let renderer = match &config.output.template {
        Some(template) => DocumentRenderer::with_template(&config.output.dir, language, template),
        None => DocumentRenderer::new(&config.output.dir, language),
    }
    .context("Failed to create document renderer")?;

    let publisher = DocumentPublisher::new(translator, renderer, Arc::new(channel), language)
        .keep_documents(config.output.keep_documents);

    let pipeline = QuizPipeline::new(
        config.source.listing_url.clone(),
        Arc::new(fetcher),
        store,
        Arc::new(publisher),
    );

    let report = pipeline.run(chrono::Local::now().date_naive()).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &RunReport) {
    match report.outcome {
        RunOutcome::NothingNew => println!("{}", t!("cli.run.nothing_new")),
        RunOutcome::NoQuestions => println!("{}", t!("cli.run.no_questions")),
        RunOutcome::Published => println!(
            "{}",
            t!(
                "cli.run.published",
                count = report.questions,
                from = report.counter_before,
                to = report.counter_after
            )
        ),
    }

    println!(
        "  links: {} discovered, {} new, {} processed, {} empty",
        report.links_discovered, report.links_new, report.links_processed, report.links_empty
    );
}
