use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::{NotificationResult, RunReport, SendOutcome, StoryFetch, StoryId};
use crate::ranking;

/// Where stories come from.
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Ids from the ranking endpoint, best first, at most `count`.
    async fn top_story_ids(&self, count: usize) -> Result<Vec<StoryId>>;

    /// A single story; failures are reported as `StoryFetch::Unavailable`.
    async fn story(&self, id: StoryId) -> StoryFetch;
}

/// Where selected stories go.
#[async_trait]
pub trait ArticleSender: Send + Sync {
    async fn send(&self, url: &str, title: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// How many top stories to inspect.
    pub stories_to_fetch: usize,
    /// How many of those to forward.
    pub stories_to_send: usize,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stories_to_fetch: 20,
            stories_to_send: 5,
            dry_run: false,
        }
    }
}

pub struct Pipeline<'a> {
    source: &'a dyn StorySource,
    sender: &'a dyn ArticleSender,
    settings: Settings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn StorySource,
        sender: &'a dyn ArticleSender,
        settings: Settings,
    ) -> Self {
        Self {
            source,
            sender,
            settings,
        }
    }

    /// Fetch, filter, rank, send. Only a failure to get the top story ids
    /// aborts the run; single stories and single sends fail on their own.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        println!(
            "Fetching top {} stories from Hacker News...",
            self.settings.stories_to_fetch
        );
        let ids = self
            .source
            .top_story_ids(self.settings.stories_to_fetch)
            .await
            .context("Failed to fetch top stories")?;
        report.inspected = ids.len();

        println!("Fetching story details...");
        let mut stories = Vec::with_capacity(ids.len());
        for id in ids {
            match self.source.story(id).await {
                StoryFetch::Found(story) => stories.push(story),
                StoryFetch::Unavailable { id, reason } => {
                    tracing::warn!(id, %reason, "skipping unavailable story");
                    report.unavailable.push(id);
                }
            }
        }

        let fetched = stories.len();
        let stories = ranking::with_external_url(stories);
        report.without_url = fetched - stories.len();
        println!("Found {} stories with external URLs.", stories.len());

        let top_stories = ranking::rank(stories, self.settings.stories_to_send);

        println!(
            "\nSending top {} most-discussed articles to Instapaper:\n",
            top_stories.len()
        );

        for (i, story) in top_stories.into_iter().enumerate() {
            let title = story.title_or_default();
            let url = story.external_url().unwrap_or_default();

            println!("{}. {}", i + 1, title);
            println!("   {}", url);
            println!("   ({} comments)", story.descendants);

            let outcome = if self.settings.dry_run {
                SendOutcome::Skipped
            } else {
                match self.sender.send(url, title).await {
                    Ok(()) => SendOutcome::Sent,
                    Err(e) => {
                        tracing::warn!(id = story.id, error = %format!("{:#}", e), "send failed");
                        SendOutcome::Failed(format!("{:#}", e))
                    }
                }
            };
            println!("   {}\n", outcome);

            report.selected.push(NotificationResult { story, outcome });
        }

        println!("Done!");

        Ok(report)
    }
}
