//! Telegram channel: long-polls the Bot API for updates.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, ReplyMarkup};
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Long-poll wait passed to getUpdates, in seconds.
const POLL_TIMEOUT_SECS: u64 = 30;

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Telegram channel, connected to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: SecretString,
    allowed_users: Vec<String>,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: SecretString, allowed_users: Vec<String>) -> Self {
        Self {
            bot_token,
            allowed_users,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        api_url(&self.bot_token, method)
    }

    /// Check if a username or numeric id is in the allowed list.
    pub fn is_user_allowed(&self, identity: &str) -> bool {
        check_user_allowed(&self.allowed_users, [identity])
    }

    /// Send a plain-text message, split to fit Telegram's limit. The markup
    /// rides on the last chunk so the keyboard appears under the final part.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let markup = if i == last { markup } else { None };
            self.send_message_chunk(chat_id, chunk, markup).await?;
        }
        Ok(())
    }

    async fn send_message_chunk(
        &self,
        chat_id: &str,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), ChannelError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = markup {
            body["reply_markup"] = reply_markup_json(markup);
        }

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: e.without_url().to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "telegram".into(),
                reason: format!("sendMessage returned {status}: {err}"),
            });
        }

        Ok(())
    }
}

// ── Channel trait implementation ────────────────────────────────────

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let url = self.api_url("getUpdates");
        let allowed_users = self.allowed_users.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for messages...");

            loop {
                let body = json!({
                    "offset": offset,
                    "timeout": POLL_TIMEOUT_SECS,
                    "allowed_updates": ["message"]
                });

                let resp = match client
                    .post(&url)
                    .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
                    .json(&body)
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {}", e.without_url());
                        tokio::time::sleep(ERROR_BACKOFF).await;
                        continue;
                    }
                };

                let data: Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {}", e.without_url());
                        tokio::time::sleep(ERROR_BACKOFF).await;
                        continue;
                    }
                };

                if data.get("ok").and_then(Value::as_bool) == Some(false) {
                    tracing::warn!(
                        description = data.get("description").and_then(serde_json::Value::as_str).unwrap_or(""),
                        "Telegram getUpdates rejected"
                    );
                    tokio::time::sleep(ERROR_BACKOFF).await;
                    continue;
                }

                let Some(results) = data.get("result").and_then(Value::as_array) else {
                    continue;
                };

                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(incoming) = parse_update(update, &allowed_users) else {
                        continue;
                    };

                    if tx.send(incoming).is_err() {
                        tracing::info!("Telegram listener channel closed");
                        return;
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let chat_id = msg
            .metadata_str("chat_id")
            .ok_or_else(|| ChannelError::SendFailed {
                name: "telegram".into(),
                reason: "No chat_id in message metadata".into(),
            })?;

        self.send_message(chat_id, &response.content, response.markup.as_ref())
            .await
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: e.without_url().to_string(),
            })?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::StartupFailed {
                name: "telegram".into(),
                reason: format!("getMe returned {}", resp.status()),
            })
        }
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::info!("Telegram channel shutting down");
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn api_url(token: &SecretString, method: &str) -> String {
    format!(
        "https://api.telegram.org/bot{}/{method}",
        token.expose_secret()
    )
}

/// Turn one getUpdates entry into an inbound message.
///
/// Returns `None` for non-text updates and for senders outside the allowlist.
fn parse_update(update: &Value, allowed_users: &[String]) -> Option<IncomingMessage> {
    let message = update.get("message")?;
    let text = message.get("text").and_then(Value::as_str)?;
    let from = message.get("from");

    let str_field = |key: &str| {
        from.and_then(|f| f.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    };
    let username = str_field("username");
    let first_name = str_field("first_name");
    let last_name = str_field("last_name");
    let user_id = from
        .and_then(|f| f.get("id"))
        .and_then(Value::as_i64)
        .map(|id| id.to_string());

    // Without a numeric id there is nothing stable to key the session on.
    let Some(user_id) = user_id else {
        tracing::warn!("Telegram: ignoring message without sender id");
        return None;
    };

    let identities = [username, user_id.as_str()];
    if !check_user_allowed(allowed_users, identities.iter().copied().filter(|s| !s.is_empty())) {
        tracing::warn!(
            username,
            user_id = %user_id,
            "Telegram: ignoring message from unauthorized user"
        );
        return None;
    }

    let chat_id = message
        .get("chat")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .map(|id| id.to_string())
        .unwrap_or_else(|| user_id.clone());

    let mut incoming = IncomingMessage::new("telegram", &user_id, text).with_metadata(json!({
        "chat_id": chat_id,
        "username": username,
        "first_name": first_name,
        "last_name": last_name,
    }));
    let display = [username, first_name].into_iter().find(|s| !s.is_empty());
    if let Some(name) = display {
        incoming = incoming.with_user_name(name);
    }
    Some(incoming)
}

/// Bot API `reply_markup` object for a markup value.
fn reply_markup_json(markup: &ReplyMarkup) -> Value {
    match markup {
        ReplyMarkup::Keyboard(rows) => {
            let keyboard: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
                .collect();
            json!({
                "keyboard": keyboard,
                "resize_keyboard": true,
                "one_time_keyboard": true,
            })
        }
        ReplyMarkup::Remove => json!({ "remove_keyboard": true }),
    }
}

/// Check if any identity in the iterator matches the allowed users list.
fn check_user_allowed<'a>(
    allowed_users: &[String],
    identities: impl IntoIterator<Item = &'a str>,
) -> bool {
    let ids: Vec<&str> = identities.into_iter().collect();
    allowed_users
        .iter()
        .any(|u| u == "*" || ids.contains(&u.as_str()))
}

/// Split a message into chunks of at most `max_chars` characters.
/// Tries to split on newlines, then spaces, then hard-cuts on a char boundary.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut remaining = text;

    loop {
        let Some((limit, _)) = remaining.char_indices().nth(max_chars) else {
            chunks.push(remaining.to_string());
            break;
        };

        let window = &remaining[..limit];
        let split_at = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
        if remaining.is_empty() {
            break;
        }
    }

    chunks
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(allowed: &[&str]) -> TelegramChannel {
        TelegramChannel::new(
            SecretString::from("123:ABC"),
            allowed.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn update(text: &str) -> Value {
        json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "from": {"id": 555, "username": "alice", "first_name": "Alice", "last_name": "Smith"},
                "chat": {"id": 777},
                "text": text,
            }
        })
    }

    // ── Basic channel tests ─────────────────────────────────────────

    #[test]
    fn telegram_channel_name() {
        assert_eq!(channel(&["*"]).name(), "telegram");
    }

    #[test]
    fn telegram_api_url() {
        assert_eq!(
            channel(&[]).api_url("getMe"),
            "https://api.telegram.org/bot123:ABC/getMe"
        );
    }

    // ── User allowlist tests ────────────────────────────────────────

    #[test]
    fn telegram_user_allowed_wildcard() {
        assert!(channel(&["*"]).is_user_allowed("anyone"));
    }

    #[test]
    fn telegram_user_allowed_specific() {
        let ch = channel(&["alice", "bob"]);
        assert!(ch.is_user_allowed("alice"));
        assert!(!ch.is_user_allowed("eve"));
    }

    #[test]
    fn telegram_user_denied_empty() {
        assert!(!channel(&[]).is_user_allowed("anyone"));
    }

    #[test]
    fn telegram_user_exact_match_not_substring() {
        let ch = channel(&["alice"]);
        assert!(!ch.is_user_allowed("alice_bot"));
        assert!(!ch.is_user_allowed("malice"));
    }

    // ── Update parsing ──────────────────────────────────────────────

    #[test]
    fn parse_text_update() {
        let msg = parse_update(&update("/start"), &["*".to_string()]).unwrap();
        assert_eq!(msg.channel, "telegram");
        assert_eq!(msg.user_id, "555");
        assert_eq!(msg.content, "/start");
        assert_eq!(msg.user_name.as_deref(), Some("alice"));
        assert_eq!(msg.metadata_str("chat_id"), Some("777"));
        assert_eq!(msg.metadata_str("first_name"), Some("Alice"));
        assert_eq!(msg.metadata_str("last_name"), Some("Smith"));
    }

    #[test]
    fn parse_allows_numeric_id() {
        assert!(parse_update(&update("hi"), &["555".to_string()]).is_some());
        assert!(parse_update(&update("hi"), &["bob".to_string()]).is_none());
    }

    #[test]
    fn parse_skips_non_text() {
        let sticker = json!({
            "update_id": 11,
            "message": {"from": {"id": 555}, "chat": {"id": 777}, "sticker": {}}
        });
        assert!(parse_update(&sticker, &["*".to_string()]).is_none());
        assert!(parse_update(&json!({"update_id": 12}), &["*".to_string()]).is_none());
    }

    #[test]
    fn parse_without_username_uses_first_name() {
        let u = json!({
            "update_id": 13,
            "message": {"from": {"id": 9, "first_name": "Ivan"}, "chat": {"id": 9}, "text": "x"}
        });
        let msg = parse_update(&u, &["*".to_string()]).unwrap();
        assert_eq!(msg.user_name.as_deref(), Some("Ivan"));
        assert_eq!(msg.metadata_str("username"), None);
    }

    // ── Markup ──────────────────────────────────────────────────────

    #[test]
    fn keyboard_markup_json() {
        let markup = ReplyMarkup::keyboard([["Мужской", "Женский"]]);
        let v = reply_markup_json(&markup);
        assert_eq!(v["keyboard"][0][0]["text"], "Мужской");
        assert_eq!(v["keyboard"][0][1]["text"], "Женский");
        assert_eq!(v["resize_keyboard"], true);
        assert_eq!(v["one_time_keyboard"], true);
    }

    #[test]
    fn remove_markup_json() {
        assert_eq!(
            reply_markup_json(&ReplyMarkup::Remove),
            json!({"remove_keyboard": true})
        );
    }

    // ── split_message ───────────────────────────────────────────────

    #[test]
    fn split_short_message() {
        assert_eq!(split_message("hello", 4096), vec!["hello"]);
        assert_eq!(split_message("", 4096), vec![""]);
    }

    #[test]
    fn split_on_newline() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 10), vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn split_on_space() {
        assert_eq!(split_message("aaa bbb ccc", 8), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn split_hard_cut() {
        assert_eq!(split_message("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn split_respects_multibyte_chars() {
        let text = "привет".repeat(1000);
        let chunks = split_message(&text, 4096);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4096));
        assert_eq!(chunks.concat(), text);
    }
}
