use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::models::{Story, StoryFetch, StoryId};
use crate::pipeline::StorySource;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HackerNewsClient {
    client: Client,
    base_url: Url,
}

impl HackerNewsClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        // Url::join drops the last segment unless the base ends in a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid Hacker News base URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn top_stories_url(&self) -> Result<Url> {
        self.base_url
            .join("topstories.json")
            .context("Failed to build top stories URL")
    }

    fn item_url(&self, id: StoryId) -> Result<Url> {
        self.base_url
            .join(&format!("item/{}.json", id))
            .context("Failed to build item URL")
    }

    /// First `count` ids from the ranking endpoint. Any failure is fatal for the run.
    pub async fn fetch_top_story_ids(&self, count: usize) -> Result<Vec<StoryId>> {
        let url = self.top_stories_url()?;
        tracing::debug!(%url, "fetching top story ids");

        let ids = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch top stories from Hacker News")?
            .error_for_status()
            .context("Hacker News returned an error for top stories")?
            .json::<Vec<StoryId>>()
            .await
            .context("Failed to parse top stories response")?;

        Ok(ids.into_iter().take(count).collect())
    }

    /// Never fails: problems come back as `StoryFetch::Unavailable`.
    pub async fn fetch_story(&self, id: StoryId) -> StoryFetch {
        match self.try_fetch_story(id).await {
            Ok(Some(story)) => StoryFetch::Found(story),
            Ok(None) => StoryFetch::Unavailable {
                id,
                reason: "item not found".to_string(),
            },
            Err(e) => StoryFetch::Unavailable {
                id,
                reason: format!("{:#}", e),
            },
        }
    }

    async fn try_fetch_story(&self, id: StoryId) -> Result<Option<Story>> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, id, "fetching story");

        let story = self
            .client
            .get(url)
            .send()
            .await
            .context("Request failed")?
            .error_for_status()
            .context("Unexpected status")?
            // The API answers `null` for ids it does not know
            .json::<Option<Story>>()
            .await
            .context("Failed to parse item")?;

        Ok(story)
    }
}

#[async_trait]
impl StorySource for HackerNewsClient {
    async fn top_story_ids(&self, count: usize) -> Result<Vec<StoryId>> {
        self.fetch_top_story_ids(count).await
    }

    async fn story(&self, id: StoryId) -> StoryFetch {
        self.fetch_story(id).await
    }
}
