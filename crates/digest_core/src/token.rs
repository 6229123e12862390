use std::fmt;
use std::str::FromStr;

use engine_logging::engine_info;

/// Default per-prompt budget.
pub const MAX_PROMPT_TOKENS: u32 = 50_000;

/// Upper bounds (exclusive) and the model tier a prompt of that size fits.
pub const TOKEN_LABELS: &[(u32, &str)] = &[(32_000, "GPT-Instant"), (50_000, "GPT-Thinking")];
const OVER_LIMIT_LABEL: &str = "CHUNKING";

pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> u32;
}

/// Character-length estimate: a quarter of the char count, at least 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproxTokenCounter;

impl TokenCounter for ApproxTokenCounter {
    fn count(&self, text: &str) -> u32 {
        let estimate = text.chars().count() / 4;
        u32::try_from(estimate.max(1)).unwrap_or(u32::MAX)
    }
}

/// Exact counts with the `cl100k_base` encoding.
#[cfg(feature = "exact-tokenizer")]
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

#[cfg(feature = "exact-tokenizer")]
impl TiktokenCounter {
    pub fn load() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|err| TokenizerError::Unavailable(err.to_string()))?;
        Ok(Self { bpe })
    }
}

#[cfg(feature = "exact-tokenizer")]
impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> u32 {
        let tokens = self.bpe.encode_with_special_tokens(text).len();
        u32::try_from(tokens).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizerError {
    #[error("unknown tokenizer: {0} (expected one of: {names})", names = TokenizerMode::NAMES.join(", "))]
    Unknown(String),
    #[error("tiktoken tokenizer is not available: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizerMode {
    /// Exact when available, approximate otherwise.
    #[default]
    Auto,
    /// Exact only; unavailability is an error.
    Tiktoken,
    Approx,
}

impl TokenizerMode {
    pub const NAMES: [&'static str; 3] = ["auto", "tiktoken", "approx"];

    pub fn as_str(self) -> &'static str {
        match self {
            TokenizerMode::Auto => "auto",
            TokenizerMode::Tiktoken => "tiktoken",
            TokenizerMode::Approx => "approx",
        }
    }

    /// Resolve the mode into a concrete counter.
    pub fn counter(self) -> Result<Box<dyn TokenCounter>, TokenizerError> {
        match self {
            TokenizerMode::Approx => {
                engine_info!("Tokenizer: approx (estimate)");
                Ok(Box::new(ApproxTokenCounter))
            }
            TokenizerMode::Tiktoken => load_exact(),
            TokenizerMode::Auto => match load_exact() {
                Ok(counter) => Ok(counter),
                Err(err) => {
                    engine_info!("Tokenizer: approx (fallback, estimate): {}", err);
                    Ok(Box::new(ApproxTokenCounter))
                }
            },
        }
    }
}

impl FromStr for TokenizerMode {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(TokenizerMode::Auto),
            "tiktoken" => Ok(TokenizerMode::Tiktoken),
            "approx" => Ok(TokenizerMode::Approx),
            other => Err(TokenizerError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "exact-tokenizer")]
fn load_exact() -> Result<Box<dyn TokenCounter>, TokenizerError> {
    let counter = TiktokenCounter::load()?;
    engine_info!("Tokenizer: tiktoken (cl100k_base)");
    Ok(Box::new(counter))
}

#[cfg(not(feature = "exact-tokenizer"))]
fn load_exact() -> Result<Box<dyn TokenCounter>, TokenizerError> {
    Err(TokenizerError::Unavailable(
        "built without the exact-tokenizer feature".to_string(),
    ))
}

/// Which model tier a prompt of `count` tokens fits into.
pub fn label_for_tokens(count: u32) -> &'static str {
    TOKEN_LABELS
        .iter()
        .find(|(limit, _)| count < *limit)
        .map(|(_, label)| *label)
        .unwrap_or(OVER_LIMIT_LABEL)
}

#[cfg(test)]
mod tests {
    use super::{label_for_tokens, ApproxTokenCounter, TokenCounter, TokenizerError, TokenizerMode};

    #[test]
    fn approx_divides_chars_by_four_with_floor_of_one() {
        assert_eq!(ApproxTokenCounter.count(""), 1);
        assert_eq!(ApproxTokenCounter.count("abc"), 1);
        assert_eq!(ApproxTokenCounter.count("abcdefgh"), 2);
        assert_eq!(ApproxTokenCounter.count("abcdefghijk"), 2);
        // Counted in chars, not bytes.
        assert_eq!(ApproxTokenCounter.count("ąęśćżźół"), 2);
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(label_for_tokens(0), "GPT-Instant");
        assert_eq!(label_for_tokens(31_999), "GPT-Instant");
        assert_eq!(label_for_tokens(32_000), "GPT-Thinking");
        assert_eq!(label_for_tokens(49_999), "GPT-Thinking");
        assert_eq!(label_for_tokens(50_000), "CHUNKING");
    }

    #[test]
    fn mode_names_round_trip() {
        for name in TokenizerMode::NAMES {
            let mode: TokenizerMode = name.parse().unwrap();
            assert_eq!(mode.as_str(), name);
        }
        assert_eq!(
            "bert".parse::<TokenizerMode>(),
            Err(TokenizerError::Unknown("bert".to_string()))
        );
    }

    #[test]
    fn approx_mode_always_resolves() {
        let counter = TokenizerMode::Approx.counter().unwrap();
        assert_eq!(counter.count("abcdefgh"), 2);
    }

    #[test]
    fn auto_mode_always_resolves() {
        assert!(TokenizerMode::Auto.counter().is_ok());
    }

    #[cfg(feature = "exact-tokenizer")]
    #[test]
    fn explicit_tiktoken_counts_cl100k_tokens() {
        let counter = TokenizerMode::Tiktoken.counter().unwrap();
        assert_eq!(counter.count("hello world"), 2);
        // Hello | , | world | !
        assert_eq!(counter.count("Hello, world!"), 4);
        assert_eq!(ApproxTokenCounter.count("Hello, world!"), 3);
    }

    #[cfg(not(feature = "exact-tokenizer"))]
    #[test]
    fn explicit_tiktoken_without_encoder_is_an_error() {
        assert!(matches!(
            TokenizerMode::Tiktoken.counter(),
            Err(TokenizerError::Unavailable(_))
        ));
    }
}
