use engine_logging::{engine_info, engine_warn};

use crate::{FailureKind, FetchError};

/// One named way of turning a URL into text.
#[async_trait::async_trait]
pub trait ContentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Ordered strategies; the first non-blank result wins.
pub struct FallbackChain {
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl FallbackChain {
    pub fn new(primary: Box<dyn ContentStrategy>) -> Self {
        Self {
            strategies: vec![primary],
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn ContentStrategy>) -> Self {
        self.strategies.push(fallback);
        self
    }

    /// Article chain: the fallback only joins the chain when it is enabled.
    pub fn for_articles(
        primary: Box<dyn ContentStrategy>,
        fallback: Box<dyn ContentStrategy>,
        fallback_enabled: bool,
    ) -> Self {
        let chain = Self::new(primary);
        if fallback_enabled {
            chain.with_fallback(fallback)
        } else {
            chain
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Try each strategy once, in order. Returns the last error if all fail.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = None;
        for strategy in &self.strategies {
            match strategy.try_fetch(url).await {
                Ok(text) if !text.trim().is_empty() => {
                    engine_info!("Content source selected: {}", strategy.name());
                    return Ok(text);
                }
                Ok(_) => {
                    engine_warn!("{}: empty content", strategy.name());
                    last_error = Some(FetchError::new(
                        FailureKind::EmptyContent,
                        format!("{} returned no text", strategy.name()),
                    ));
                }
                Err(err) => {
                    engine_warn!("{}: error ({})", strategy.name(), err);
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            FetchError::new(FailureKind::NoStrategy, "no content strategy configured")
        }))
    }
}
