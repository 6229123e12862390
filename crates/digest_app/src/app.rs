use std::io::{self, Write};

use anyhow::Context;
use digest_core::ChunkBudget;
use digest_engine::{
    detect_backend, BrowserStrategy, CommandClipboard, ContentOrchestrator, Delivery,
    FallbackChain, FeedSettings, MinifluxClient, ReaderSettings, ReaderStrategy, RenderSettings,
    RunController, RunSummary, StdinConfirm, TranscriptFetcher, TranscriptSettings,
};
use engine_logging::engine_info;

use crate::cli::Cli;
use crate::config::AppConfig;

/// Build every collaborator from `cli` and `config`, then run one digest pass.
pub async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<RunSummary> {
    let feed = MinifluxClient::new(FeedSettings::new(&config.base_url, &config.api_token))
        .context("feed client setup failed")?;

    let reader = ReaderStrategy::new(ReaderSettings {
        base_url: config.reader_base_url.clone(),
        ..ReaderSettings::default()
    })
    .context("reader client setup failed")?;
    let browser = BrowserStrategy::new(RenderSettings {
        chromium_bin: config.chromium_bin.clone(),
        ..RenderSettings::default()
    });
    let articles =
        FallbackChain::for_articles(Box::new(reader), Box::new(browser), cli.browser_fallback);

    let transcript_settings = TranscriptSettings {
        language: config.transcript_language.clone(),
        ..TranscriptSettings::default()
    };
    let backend = detect_backend(&transcript_settings)
        .await
        .context("transcript backend setup failed")?;
    let transcripts = TranscriptFetcher::new(backend, &config.transcript_language);

    let content = ContentOrchestrator::new(articles, transcripts);
    engine_info!(
        "Article sources: {}; transcripts: {}; max tokens: {}",
        content.article_sources().join(" -> "),
        content.transcript_backend(),
        cli.max_tokens
    );

    let clipboard = match &config.clipboard_command {
        Some(line) => CommandClipboard::from_command_line(line)
            .unwrap_or_else(CommandClipboard::detect),
        None => CommandClipboard::detect(),
    };
    let mut confirm = StdinConfirm;
    let delivery = if cli.is_interactive() {
        engine_info!("Clipboard: {}", clipboard.program());
        Delivery::Interactive {
            clipboard: &clipboard,
            confirm: &mut confirm,
        }
    } else {
        Delivery::Batch
    };

    let budget = ChunkBudget::new(cli.max_tokens, cli.tokenizer);
    let controller =
        RunController::new(&feed, &content, budget).context("tokenizer setup failed")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = controller.run(delivery, &mut out).await?;
    out.flush()?;
    Ok(summary)
}
