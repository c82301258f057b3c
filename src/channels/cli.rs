//! CLI channel: stdin/stdout REPL for local use without a bot token.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, ReplyMarkup};
use crate::error::ChannelError;

const LOCAL_USER: &str = "local-user";

/// Talks to a single local user over the terminal.
#[derive(Default)]
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }
}

fn show_prompt() {
    eprint!("> ");
}

/// Text form of a keyboard: one line per row, buttons in brackets.
fn render_markup(markup: &ReplyMarkup) -> Option<String> {
    match markup {
        ReplyMarkup::Keyboard(rows) => Some(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|label| format!("[{label}]"))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        ReplyMarkup::Remove => None,
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<IncomingMessage>();

        tokio::spawn(async move {
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            show_prompt();

            loop {
                let line = match input.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::debug!("stdin closed");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read failed");
                        break;
                    }
                };

                let text = line.trim();
                if text.is_empty() {
                    show_prompt();
                    continue;
                }

                let msg = IncomingMessage::new("cli", LOCAL_USER, text).with_user_name(LOCAL_USER);
                if tx.send(msg).is_err() {
                    break;
                }
            }
        });

        Ok(Box::pin(stream::unfold(rx, |mut rx| async move {
            let next = rx.recv().await;
            next.map(move |msg| (msg, rx))
        })))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        println!("\n{}", response.content);
        if let Some(keys) = response.markup.as_ref().and_then(render_markup) {
            println!("{keys}");
        }
        show_prompt();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), ChannelError> {
        tracing::debug!("CLI channel closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_rows_render_as_brackets() {
        let markup = ReplyMarkup::keyboard([vec!["Мужской", "Женский"], vec!["Отмена"]]);
        assert_eq!(
            render_markup(&markup).unwrap(),
            "[Мужской] [Женский]\n[Отмена]"
        );
    }

    #[test]
    fn remove_renders_nothing() {
        assert_eq!(render_markup(&ReplyMarkup::Remove), None);
    }

    #[tokio::test]
    async fn respond_never_fails() {
        let ch = CliChannel::new();
        let msg = IncomingMessage::new("cli", LOCAL_USER, "hi");
        assert!(ch.respond(&msg, OutgoingResponse::text("ok")).await.is_ok());
        assert!(ch.health_check().await.is_ok());
    }
}
