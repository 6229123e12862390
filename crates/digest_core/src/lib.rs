//! Digest core: pure classification, prompt assembly and token-bounded chunking.
mod chunk;
mod classify;
mod entry;
mod plan;
mod prompt;
mod token;

pub use chunk::{chunk, pack_items, ChunkBudget, ChunkOutcome};
pub use classify::{extract_video_id, is_short_form, is_video_platform};
pub use entry::{Entry, EntryId, ProcessedItem};
pub use plan::{plan_entry, EntryPlan, SkipReason};
pub use prompt::{build_prompt, ITEMS_END, ITEMS_START, PREAMBLE};
#[cfg(feature = "exact-tokenizer")]
pub use token::TiktokenCounter;
pub use token::{
    label_for_tokens, ApproxTokenCounter, TokenCounter, TokenizerError, TokenizerMode,
    MAX_PROMPT_TOKENS, TOKEN_LABELS,
};
