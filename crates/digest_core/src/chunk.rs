//! Greedy, order-preserving packing of items into token-bounded prompts.
use engine_logging::engine_info;

use crate::prompt::assemble;
use crate::token::{TokenCounter, TokenizerError, TokenizerMode};
use crate::ProcessedItem;

/// Per-prompt budget and the tokenizer that measures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBudget {
    pub max_tokens: u32,
    pub tokenizer: TokenizerMode,
}

impl ChunkBudget {
    pub fn new(max_tokens: u32, tokenizer: TokenizerMode) -> Self {
        Self {
            max_tokens,
            tokenizer,
        }
    }

    /// Resolve the tokenizer once for a whole run.
    pub fn counter(&self) -> Result<Box<dyn TokenCounter>, TokenizerError> {
        self.tokenizer.counter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkOutcome {
    pub prompts: Vec<String>,
    /// Indices of items whose solo prompt exceeded the budget.
    pub dropped: Vec<usize>,
}

pub fn chunk(items: &[ProcessedItem], max_tokens: u32, counter: &dyn TokenCounter) -> Vec<String> {
    pack_items(items, max_tokens, counter).prompts
}

/// Pack items into prompts, each within `max_tokens` (inclusive).
///
/// A batch grows until the next item would push it over budget; the batch is
/// then closed and the item starts a new one. An item that is over budget on
/// its own is dropped and the batch restarts empty.
pub fn pack_items(
    items: &[ProcessedItem],
    max_tokens: u32,
    counter: &dyn TokenCounter,
) -> ChunkOutcome {
    let mut outcome = ChunkOutcome::default();
    let mut current: Vec<&ProcessedItem> = Vec::new();
    // Assembled prompt of `current` whenever `current` is non-empty.
    let mut current_prompt = String::new();

    for (index, item) in items.iter().enumerate() {
        current.push(item);
        let prompt = assemble(current.iter().copied());
        if prompt.is_empty() {
            current.pop();
            continue;
        }
        if counter.count(&prompt) <= max_tokens {
            current_prompt = prompt;
            continue;
        }

        current.pop();
        if !current.is_empty() {
            outcome.prompts.push(std::mem::take(&mut current_prompt));
            current = vec![item];
            let solo = assemble(current.iter().copied());
            if !solo.is_empty() && counter.count(&solo) <= max_tokens {
                current_prompt = solo;
                continue;
            }
        }

        engine_info!(
            "Item {} ({:?}) exceeds max token limit of {} and was skipped",
            index,
            item.title,
            max_tokens
        );
        outcome.dropped.push(index);
        current.clear();
        current_prompt.clear();
    }

    if !current.is_empty() {
        outcome.prompts.push(current_prompt);
    }

    outcome
}
