use serde::Deserialize;
use std::fmt;

pub type StoryId = u64;

const UNTITLED: &str = "Untitled";

/// A Hacker News item as returned by `/v0/item/{id}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(default)]
    pub title: Option<String>,
    /// Absent for self-posts (Ask HN, text submissions).
    #[serde(default)]
    pub url: Option<String>,
    /// Total comment count.
    #[serde(default)]
    pub descendants: u64,
}

impl Story {
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn external_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Outcome of fetching a single story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryFetch {
    Found(Story),
    Unavailable { id: StoryId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed(String),
    /// Not attempted (dry run).
    Skipped,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendOutcome::Sent => write!(f, "✓ Sent to Instapaper"),
            SendOutcome::Failed(reason) => write!(f, "✗ Failed to send: {}", reason),
            SendOutcome::Skipped => write!(f, "- Skipped (dry run)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationResult {
    pub story: Story,
    pub outcome: SendOutcome,
}

/// Everything a run produced, for the caller to summarize or inspect.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Story ids returned by the ranking endpoint.
    pub inspected: usize,
    pub unavailable: Vec<StoryId>,
    /// Stories that fetched fine but have no external URL.
    pub without_url: usize,
    pub selected: Vec<NotificationResult>,
}

impl RunReport {
    pub fn sent_count(&self) -> usize {
        self.selected
            .iter()
            .filter(|result| result.outcome.is_sent())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.selected
            .iter()
            .filter(|result| matches!(result.outcome, SendOutcome::Failed(_)))
            .count()
    }
}
