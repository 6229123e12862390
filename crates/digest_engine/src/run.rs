use std::fmt;
use std::io::Write;

use digest_core::{
    build_prompt, chunk, label_for_tokens, ChunkBudget, ProcessedItem, TokenCounter, TokenizerError,
};
use engine_logging::engine_info;

use crate::deliver::{deliver_prompts, CountedPrompt, Delivery, DeliveryError};
use crate::feed::{FeedError, FeedSource};
use crate::orchestrator::ContentFetcher;
use crate::process::{EntryOutcome, EntryProcessor};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Counters of one run. `Display` renders the final summary line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub prompts: usize,
    pub total_tokens: Option<u32>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unread entries: {}; Success: {}; Failed: {}; Skipped: {}",
            self.entries, self.succeeded, self.failed, self.skipped
        )?;
        let Some(tokens) = self.total_tokens else {
            return Ok(());
        };
        if self.prompts > 1 {
            write!(f, "; Prompts: {}", self.prompts)?;
        }
        write!(f, "; Tokens: {}; Label: {}", tokens, label_for_tokens(tokens))
    }
}

pub struct RunController<'a> {
    feed: &'a dyn FeedSource,
    content: &'a dyn ContentFetcher,
    counter: Box<dyn TokenCounter>,
    max_tokens: u32,
}

impl<'a> RunController<'a> {
    /// Fails only when the budget's tokenizer cannot be resolved.
    pub fn new(
        feed: &'a dyn FeedSource,
        content: &'a dyn ContentFetcher,
        budget: ChunkBudget,
    ) -> Result<Self, TokenizerError> {
        Ok(Self {
            feed,
            content,
            counter: budget.counter()?,
            max_tokens: budget.max_tokens,
        })
    }

    /// One full pass: list, process, chunk, deliver. Only listing and delivery errors escape.
    pub async fn run(
        &self,
        delivery: Delivery<'_>,
        out: &mut dyn Write,
    ) -> Result<RunSummary, RunError> {
        let entries = self.feed.list_unread().await?;
        let mut summary = RunSummary {
            entries: entries.len(),
            ..RunSummary::default()
        };

        let processor = EntryProcessor::new(self.content, self.feed);
        let mut items: Vec<ProcessedItem> = Vec::new();
        for entry in &entries {
            let report = processor.process(entry).await;
            match report.outcome {
                EntryOutcome::Processed(item) => {
                    summary.succeeded += 1;
                    items.push(item);
                }
                EntryOutcome::Skipped(_) => summary.skipped += 1,
                EntryOutcome::Failed(_) => summary.failed += 1,
            }
        }

        let prompts = chunk(&items, self.max_tokens, self.counter.as_ref());
        if prompts.is_empty() {
            engine_info!("No prompts to deliver; clipboard left untouched");
            return Ok(summary);
        }

        let total_tokens = self.counter.count(&build_prompt(&items));
        let counted: Vec<CountedPrompt> = prompts
            .into_iter()
            .map(|text| CountedPrompt {
                tokens: self.counter.count(&text),
                text,
            })
            .collect();
        summary.prompts = counted.len();
        summary.total_tokens = Some(total_tokens);

        deliver_prompts(&counted, total_tokens, delivery, out).await?;
        Ok(summary)
    }
}
