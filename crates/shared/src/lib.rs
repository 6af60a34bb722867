// Public modules
pub mod config;
pub mod hackernews;
pub mod instapaper;
pub mod models;
pub mod pipeline;
pub mod ranking;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use hackernews::HackerNewsClient;
pub use instapaper::InstapaperMailer;
pub use models::{NotificationResult, RunReport, SendOutcome, Story, StoryFetch, StoryId};
pub use pipeline::{ArticleSender, Pipeline, Settings, StorySource};
