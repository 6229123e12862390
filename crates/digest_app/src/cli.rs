use std::path::PathBuf;

use clap::Parser;
use digest_core::{TokenizerError, TokenizerMode, MAX_PROMPT_TOKENS};

#[derive(Debug, Parser)]
#[command(name = "feed_digest")]
#[command(about = "Compile unread Miniflux entries into token-bounded LLM prompts")]
pub struct Cli {
    /// Render the page in headless Chromium when the reader service fails
    #[arg(long, visible_alias = "playwright")]
    pub browser_fallback: bool,

    /// Copy prompts to the clipboard one by one (default)
    #[arg(long, conflicts_with = "no_interactive")]
    pub interactive: bool,

    /// Print prompts to stdout instead of copying them
    #[arg(long)]
    pub no_interactive: bool,

    /// Maximum tokens per prompt
    #[arg(long, default_value_t = MAX_PROMPT_TOKENS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: u32,

    /// Token counter: auto, tiktoken or approx
    #[arg(long, default_value = "auto", value_parser = parse_tokenizer)]
    pub tokenizer: TokenizerMode,

    /// Key-value file with credentials; the process environment takes precedence
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        self.interactive || !self.no_interactive
    }
}

fn parse_tokenizer(value: &str) -> Result<TokenizerMode, TokenizerError> {
    value.parse()
}
