use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::pipeline::ArticleSender;

pub const SMTP_HOST: &str = "smtp.mail.me.com";
pub const SMTP_PORT: u16 = 587;

/// Saves articles to Instapaper by mailing their URL to the save-by-email address.
pub struct InstapaperMailer {
    from: Mailbox,
    to: Mailbox,
    credentials: Credentials,
}

impl InstapaperMailer {
    pub fn new(config: &Config) -> Result<Self> {
        let from = config
            .icloud_email
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid ICLOUD_EMAIL address: {}", config.icloud_email))?;
        let to = config.instapaper_email.parse::<Mailbox>().with_context(|| {
            format!(
                "Invalid INSTAPAPER_EMAIL address: {}",
                config.instapaper_email
            )
        })?;
        let credentials = Credentials::new(
            config.icloud_email.clone(),
            config.icloud_app_password.clone(),
        );

        Ok(Self {
            from,
            to,
            credentials,
        })
    }

    /// Plain-text message with the title as subject and the URL as the body.
    pub fn build_message(&self, url: &str, title: &str) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(title)
            .header(ContentType::TEXT_PLAIN)
            .body(url.to_string())
            .context("Failed to build email")
    }

    pub async fn send_article(&self, url: &str, title: &str) -> Result<()> {
        let message = self.build_message(url, title)?;

        // Built per send and dropped on return, so the connection never outlives the call
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_HOST)
            .context("Failed to configure SMTP relay")?
            .port(SMTP_PORT)
            .credentials(self.credentials.clone())
            .build();

        transport
            .send(message)
            .await
            .context("SMTP submission failed")?;

        tracing::debug!(url, "article mailed to Instapaper");
        Ok(())
    }
}

#[async_trait]
impl ArticleSender for InstapaperMailer {
    async fn send(&self, url: &str, title: &str) -> Result<()> {
        self.send_article(url, title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            icloud_email: "me@icloud.com".to_string(),
            icloud_app_password: "abcd-efgh-ijkl-mnop".to_string(),
            instapaper_email: "readlater.abc123@instapaper.com".to_string(),
        }
    }

    #[test]
    fn test_message_headers_and_body() {
        let mailer = InstapaperMailer::new(&config()).unwrap();
        let message = mailer
            .build_message("https://example.com/post", "An Interesting Post")
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: me@icloud.com"));
        assert!(raw.contains("To: readlater.abc123@instapaper.com"));
        assert!(raw.contains("Subject: An Interesting Post"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.trim_end().ends_with("https://example.com/post"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut bad = config();
        bad.instapaper_email = "not an address".to_string();
        let err = InstapaperMailer::new(&bad).err().unwrap();
        assert!(err.to_string().contains("INSTAPAPER_EMAIL"));
    }
}
