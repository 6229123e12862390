//! Digest engine: content acquisition, feed access, delivery and the run controller.
mod article;
mod chain;
mod decode;
mod deliver;
mod feed;
mod orchestrator;
mod page;
mod process;
mod render;
mod run;
mod transcript;
mod types;

pub use article::{ReaderSettings, ReaderStrategy, DEFAULT_READER_BASE};
pub use chain::{ContentStrategy, FallbackChain};
pub use decode::{decode_text, DecodedText};
pub use deliver::{
    deliver_prompts, Clipboard, CommandClipboard, ConfirmSignal, CountedPrompt, Delivery,
    DeliveryError, StdinConfirm,
};
pub use feed::{FeedError, FeedSettings, FeedSource, MinifluxClient, DEFAULT_FEED_BASE};
pub use orchestrator::{ContentFetcher, ContentOrchestrator};
pub use page::{extract_page_text, ConsentOutcome, PageText, CONSENT_LABELS};
pub use process::{EntryOutcome, EntryProcessor, EntryReport, MarkReadStatus};
pub use render::{BrowserStrategy, RenderSettings};
pub use run::{RunController, RunError, RunSummary};
pub use transcript::{
    detect_backend, join_fragments, parse_json3, TimedTextBackend, TranscriptBackend,
    TranscriptFetcher, TranscriptItem, TranscriptSettings, YtDlpBackend, DEFAULT_TIMEDTEXT_URL,
};
pub use types::{FailureKind, FetchError};
