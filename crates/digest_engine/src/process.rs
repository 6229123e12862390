use digest_core::{plan_entry, Entry, EntryPlan, ProcessedItem, SkipReason};
use engine_logging::{engine_info, engine_warn};

use crate::feed::{FeedError, FeedSource};
use crate::orchestrator::ContentFetcher;
use crate::{FailureKind, FetchError};

/// Terminal state of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Processed(ProcessedItem),
    Skipped(SkipReason),
    Failed(FetchError),
}

/// Result of the best-effort mark-read side effect. Never changes the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkReadStatus {
    /// The entry was not processed, so it stays unread.
    NotAttempted,
    MissingId,
    Marked(u64),
    Failed { entry_id: u64, error: FeedError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub outcome: EntryOutcome,
    pub mark_read: MarkReadStatus,
}

pub struct EntryProcessor<'a> {
    content: &'a dyn ContentFetcher,
    feed: &'a dyn FeedSource,
}

impl<'a> EntryProcessor<'a> {
    pub fn new(content: &'a dyn ContentFetcher, feed: &'a dyn FeedSource) -> Self {
        Self { content, feed }
    }

    pub async fn process(&self, entry: &Entry) -> EntryReport {
        let outcome = self.fetch(entry).await;
        let mark_read = match &outcome {
            EntryOutcome::Processed(_) => self.mark_read(entry).await,
            _ => MarkReadStatus::NotAttempted,
        };
        EntryReport { outcome, mark_read }
    }

    async fn fetch(&self, entry: &Entry) -> EntryOutcome {
        let (title, fetched) = match plan_entry(entry) {
            EntryPlan::Skip(reason) => {
                engine_info!("Skipped '{}': {}", entry.title(), reason);
                return EntryOutcome::Skipped(reason);
            }
            EntryPlan::Article { title, url } => {
                engine_info!("Article: {}", url);
                let fetched = self.content.fetch_article(&url).await;
                (title, fetched)
            }
            EntryPlan::Transcript { title, video_id } => {
                engine_info!("Video: {}", video_id);
                let fetched = self.content.fetch_transcript(&video_id).await;
                (title, fetched)
            }
        };

        match fetched {
            Ok(content) if !content.trim().is_empty() => {
                EntryOutcome::Processed(ProcessedItem::new(title, content))
            }
            Ok(_) => {
                engine_warn!("Failed '{}': empty content", title);
                EntryOutcome::Failed(FetchError::new(
                    FailureKind::EmptyContent,
                    "fetched content is blank",
                ))
            }
            Err(err) => {
                engine_warn!("Failed '{}': {}", title, err);
                EntryOutcome::Failed(err)
            }
        }
    }

    async fn mark_read(&self, entry: &Entry) -> MarkReadStatus {
        let Some(entry_id) = entry.resolved_id() else {
            engine_info!("'{}' has no usable id; left unread", entry.title());
            return MarkReadStatus::MissingId;
        };
        match self.feed.mark_read(entry_id).await {
            Ok(()) => MarkReadStatus::Marked(entry_id),
            Err(error) => {
                engine_warn!("Could not mark entry {} read: {}", entry_id, error);
                MarkReadStatus::Failed { entry_id, error }
            }
        }
    }
}
