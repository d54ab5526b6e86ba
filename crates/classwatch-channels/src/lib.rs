//! # ClassWatch Channels
//!
//! Notification channel implementations. Discord is the only live
//! channel; everything behind [`classwatch_core::NotificationSink`].

pub mod discord;

pub use discord::DiscordChannel;
