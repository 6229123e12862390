use std::fmt;

use crate::classify::{extract_video_id, is_short_form, is_video_platform};
use crate::Entry;

/// Why an entry was not fetched at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingUrl,
    ShortFormVideo,
    InvalidVideoUrl,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingUrl => write!(f, "entry has no url"),
            SkipReason::ShortFormVideo => write!(f, "short-form video"),
            SkipReason::InvalidVideoUrl => write!(f, "video url without a video id"),
        }
    }
}

/// Acquisition decision for one entry. Executing it is the engine's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPlan {
    Skip(SkipReason),
    Article { title: String, url: String },
    Transcript { title: String, video_id: String },
}

/// Pure classification step of the entry processor.
pub fn plan_entry(entry: &Entry) -> EntryPlan {
    let Some(url) = entry.url() else {
        return EntryPlan::Skip(SkipReason::MissingUrl);
    };
    let title = entry.title().to_string();

    if is_video_platform(url) {
        if is_short_form(url) {
            return EntryPlan::Skip(SkipReason::ShortFormVideo);
        }
        return match extract_video_id(url) {
            Some(video_id) => EntryPlan::Transcript { title, video_id },
            None => EntryPlan::Skip(SkipReason::InvalidVideoUrl),
        };
    }

    EntryPlan::Article {
        title,
        url: url.to_string(),
    }
}
