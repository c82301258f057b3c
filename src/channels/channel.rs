//! Transport-neutral message types and the `Channel` trait.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;

use crate::error::ChannelError;

/// Stream of inbound events produced by a started channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// One inbound text event from an end user.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel that produced the message ("telegram", "cli").
    pub channel: String,
    /// Stable external user id; keys the session and the `users` row.
    pub user_id: String,
    /// Human-friendly name for logs.
    pub user_name: Option<String>,
    pub content: String,
    pub received_at: DateTime<Utc>,
    /// Channel-specific routing data (chat id, display-name parts).
    pub metadata: serde_json::Value,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: &str, content: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            user_name: None,
            content: content.to_string(),
            received_at: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_user_name(mut self, name: &str) -> Self {
        self.user_name = Some(name.to_string());
        self
    }

    /// String metadata field, if present and non-empty.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Quick-reply markup attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMarkup {
    /// Rows of button labels. Pressing a button sends its label as text.
    Keyboard(Vec<Vec<String>>),
    /// Hide any keyboard currently shown.
    Remove,
}

impl ReplyMarkup {
    pub fn keyboard<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keyboard(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// One outbound reply. A turn may produce several, sent in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub content: String,
    /// `None` leaves whatever keyboard the client currently shows.
    pub markup: Option<ReplyMarkup>,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            markup: None,
        }
    }

    pub fn with_keyboard(mut self, markup: ReplyMarkup) -> Self {
        self.markup = Some(markup);
        self
    }

    pub fn remove_keyboard(mut self) -> Self {
        self.markup = Some(ReplyMarkup::Remove);
        self
    }
}

/// A messaging transport.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Begin receiving messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Deliver a reply to the sender of `msg`.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    async fn health_check(&self) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let msg = IncomingMessage::new("telegram", "42", "hi")
            .with_user_name("alice")
            .with_metadata(serde_json::json!({"chat_id": "7", "last_name": ""}));
        assert_eq!(msg.user_id, "42");
        assert_eq!(msg.user_name.as_deref(), Some("alice"));
        assert_eq!(msg.metadata_str("chat_id"), Some("7"));
        assert_eq!(msg.metadata_str("last_name"), None);
        assert_eq!(msg.metadata_str("missing"), None);
    }

    #[test]
    fn keyboard_from_str_rows() {
        let markup = ReplyMarkup::keyboard([["a", "b"], ["c", "d"]]);
        assert_eq!(
            markup,
            ReplyMarkup::Keyboard(vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
            ])
        );
    }

    #[test]
    fn response_markup() {
        assert_eq!(OutgoingResponse::text("x").markup, None);
        assert_eq!(
            OutgoingResponse::text("x").remove_keyboard().markup,
            Some(ReplyMarkup::Remove)
        );
    }
}
