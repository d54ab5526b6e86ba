//! Discord channel — message delivery via the REST API.

use async_trait::async_trait;

use classwatch_core::error::{Result, WatchError};
use classwatch_core::traits::NotificationSink;

const DISCORD_API: &str = "https://discord.com/api/v10";

pub struct DiscordChannel {
    client: reqwest::Client,
    bot_token: String,
    api_base: String,
}

impl DiscordChannel {
    pub fn new(bot_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token: bot_token.to_string(),
            api_base: DISCORD_API.to_string(),
        }
    }

    /// Point the channel at a different API base (test servers).
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }
}

/// Message body with the owner mentioned on the first line, so the
/// notification pings them in-channel.
pub(crate) fn mention_body(user_id: u64, text: &str) -> serde_json::Value {
    serde_json::json!({ "content": format!("<@{user_id}>\n{text}") })
}

#[async_trait]
impl NotificationSink for DiscordChannel {
    async fn send(&self, channel_id: u64, user_id: u64, text: &str) -> Result<()> {
        let url = format!("{}/channels/{channel_id}/messages", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(&mention_body(user_id, text))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| WatchError::Notify(format!("Discord send failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("✅ Discord notification sent to channel {channel_id}");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(WatchError::Notify(format!("Discord API error {status}: {body}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_mentions_user_before_the_message() {
        let body = mention_body(42, "🎉 **SPOT AVAILABLE!**");
        assert_eq!(body["content"], "<@42>\n🎉 **SPOT AVAILABLE!**");
    }

    #[test]
    fn api_base_override_trims_trailing_slash() {
        let ch = DiscordChannel::new("t").with_api_base("http://localhost:9/api/");
        assert_eq!(ch.api_base, "http://localhost:9/api");
    }
}
