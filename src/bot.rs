//! Event loop: pulls messages from a channel and runs one dialog turn per
//! message on its own task.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::channels::{Channel, IncomingMessage, OutgoingResponse};
use crate::dialog::DialogController;
use crate::dialog::prompts;
use crate::error::{DialogError, Error};

/// Wires a channel to the dialog controller.
pub struct FitnessBot {
    channel: Arc<dyn Channel>,
    controller: DialogController,
    turn_timeout: Duration,
}

impl FitnessBot {
    pub fn new(
        channel: Arc<dyn Channel>,
        controller: DialogController,
        turn_timeout: Duration,
    ) -> Self {
        Self {
            channel,
            controller,
            turn_timeout,
        }
    }

    /// Run until Ctrl+C or until the channel's stream ends.
    pub async fn run(&self) -> Result<(), Error> {
        if let Err(e) = self.channel.health_check().await {
            warn!(channel = self.channel.name(), error = %e, "Channel health check failed");
        }

        let mut stream = self.channel.start().await?;
        info!(channel = self.channel.name(), "Fitness bot ready and listening");

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = stream.next() => match msg {
                    Some(m) => m,
                    None => {
                        info!("Channel stream ended, shutting down...");
                        break;
                    }
                }
            };

            self.dispatch(message);
        }

        self.channel.shutdown().await?;
        Ok(())
    }

    /// Spawn the turn for `message`. Turns for different users run in
    /// parallel; the session store serializes turns of the same user.
    fn dispatch(&self, message: IncomingMessage) {
        let channel = Arc::clone(&self.channel);
        let controller = self.controller.clone();
        let timeout = self.turn_timeout;

        tokio::spawn(async move {
            let user_id = message.user_id.clone();
            let turn_msg = message.clone();
            let turn = tokio::spawn(async move {
                run_turn(&controller, &turn_msg, timeout).await
            });

            let replies = match turn.await {
                Ok(Ok(replies)) => replies,
                Ok(Err(e)) => {
                    error!(user_id = %user_id, error = %e, "Turn aborted");
                    vec![prompts::turn_failed()]
                }
                Err(join_err) => {
                    error!(user_id = %user_id, error = %join_err, "Turn panicked");
                    vec![prompts::turn_failed()]
                }
            };

            send_all(channel.as_ref(), &message, replies).await;
        });
    }
}

/// Run one turn under `timeout`. On timeout the turn is dropped before it
/// commits, so the session keeps its previous state.
async fn run_turn(
    controller: &DialogController,
    message: &IncomingMessage,
    timeout: Duration,
) -> Result<Vec<OutgoingResponse>, DialogError> {
    debug!(
        user_id = %message.user_id,
        user_name = message.user_name.as_deref().unwrap_or(""),
        "Handling message"
    );
    tokio::time::timeout(timeout, controller.handle(message))
        .await
        .map_err(|_| DialogError::Timeout {
            user_id: message.user_id.clone(),
            secs: timeout.as_secs(),
        })
}

async fn send_all(channel: &dyn Channel, message: &IncomingMessage, replies: Vec<OutgoingResponse>) {
    for reply in replies {
        if let Err(e) = channel.respond(message, reply).await {
            error!(user_id = %message.user_id, error = %e, "Failed to send reply");
            break;
        }
    }
}
