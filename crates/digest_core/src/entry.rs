use serde::Deserialize;

/// Identifier of a feed entry as delivered by the feed source.
///
/// Feeds are not consistent about the JSON type of this field, so both
/// integers and strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl EntryId {
    /// A positive numeric id usable for mark-read, if there is one.
    pub fn resolve(&self) -> Option<u64> {
        let value = match self {
            EntryId::Number(n) => *n,
            EntryId::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        u64::try_from(value).ok().filter(|id| *id > 0)
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId::Number(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId::Text(value.to_string())
    }
}

/// One unread feed entry. Unknown fields in the payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<EntryId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Entry {
    pub fn new(id: i64, title: &str, url: &str) -> Self {
        Self {
            id: Some(EntryId::Number(id)),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
        }
    }

    /// Trimmed URL, or `None` when missing or blank.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Trimmed title; a missing title is the empty string.
    pub fn title(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn resolved_id(&self) -> Option<u64> {
        self.id.as_ref().and_then(EntryId::resolve)
    }
}

/// Title and fetched text of one successfully processed entry.
///
/// `content` is never blank; blank fetch results are failures upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedItem {
    pub title: String,
    pub content: String,
}

impl ProcessedItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
