use crate::chain::FallbackChain;
use crate::transcript::TranscriptFetcher;
use crate::FetchError;

/// Content acquisition as seen by the entry processor.
#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_article(&self, url: &str) -> Result<String, FetchError>;

    async fn fetch_transcript(&self, video_id: &str) -> Result<String, FetchError>;
}

/// Article chain plus the transcript fetcher pinned at startup.
pub struct ContentOrchestrator {
    articles: FallbackChain,
    transcripts: TranscriptFetcher,
}

impl ContentOrchestrator {
    pub fn new(articles: FallbackChain, transcripts: TranscriptFetcher) -> Self {
        Self {
            articles,
            transcripts,
        }
    }

    pub fn article_sources(&self) -> Vec<&'static str> {
        self.articles.names()
    }

    pub fn transcript_backend(&self) -> &'static str {
        self.transcripts.backend_name()
    }
}

#[async_trait::async_trait]
impl ContentFetcher for ContentOrchestrator {
    async fn fetch_article(&self, url: &str) -> Result<String, FetchError> {
        self.articles.fetch(url).await
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String, FetchError> {
        self.transcripts.fetch_transcript(video_id).await
    }
}
