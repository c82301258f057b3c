//! Dialog controller: runs one turn per inbound message.
//!
//! A turn works on a copy of the user's session and commits it only after
//! every storage call has succeeded. A failed or abandoned turn leaves the
//! session exactly as it was.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::channels::{IncomingMessage, OutgoingResponse};
use crate::error::{DialogError, FailurePoint};
use crate::profile::{Biometrics, Profile, compute_plan};
use crate::session::SessionStore;
use crate::store::{ProfileStore, UserInfo};

use super::commands::{Command, CommandParser};
use super::prompts;
use super::state::{Session, Stage};
use super::transitions::{Step, transition};

/// Identity of the user a turn runs for.
struct TurnUser<'a> {
    /// Internal id from the `users` table.
    id: i64,
    external_id: &'a str,
}

/// Drives the conversation state machine against a profile store.
#[derive(Clone)]
pub struct DialogController {
    store: Arc<dyn ProfileStore>,
    sessions: SessionStore,
}

impl DialogController {
    pub fn new(store: Arc<dyn ProfileStore>, sessions: SessionStore) -> Self {
        Self { store, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound message and return the replies to send, in order.
    ///
    /// The user's session stays locked until this returns; replies should be
    /// delivered afterwards.
    pub async fn handle(&self, msg: &IncomingMessage) -> Vec<OutgoingResponse> {
        let external_id = msg.user_id.as_str();
        let mut session = self.sessions.acquire(external_id).await;

        let info = user_info(msg);
        let user_id = match self.store.get_or_create_user(external_id, &info).await {
            Ok(id) => id,
            Err(e) => {
                error!(user_id = external_id, error = %e, "User registration failed");
                return vec![prompts::apology(FailurePoint::Registration)];
            }
        };
        let user = TurnUser {
            id: user_id,
            external_id,
        };

        let before = session.state();
        let mut draft = (*session).clone();

        match self.turn(&mut draft, &user, &msg.content).await {
            Ok(replies) => {
                if draft.state() != before {
                    debug!(
                        user_id = external_id,
                        from = %before,
                        to = %draft.state(),
                        "State transition"
                    );
                }
                *session = draft;
                replies
            }
            Err(DialogError::Persistence { point, source }) => {
                error!(
                    user_id = external_id,
                    state = %before,
                    %point,
                    error = %source,
                    "Persistence failed; turn not committed"
                );
                vec![prompts::apology(point)]
            }
            Err(e) => {
                error!(user_id = external_id, error = %e, "Turn failed");
                vec![prompts::turn_failed()]
            }
        }
    }

    async fn turn(
        &self,
        draft: &mut Session,
        user: &TurnUser<'_>,
        text: &str,
    ) -> Result<Vec<OutgoingResponse>, DialogError> {
        if let Some(command) = CommandParser::parse(text) {
            return self.run_command(draft, user, command).await;
        }

        match transition(&draft.stage, text) {
            Step::Advance { next, replies } => {
                draft.stage = next;
                Ok(replies)
            }
            Step::Reject { error, replies } => {
                debug!(
                    user_id = user.external_id,
                    state = %draft.state(),
                    reason = ?error,
                    "Input rejected"
                );
                Ok(replies)
            }
            Step::Complete(biometrics) => {
                draft.stage = Stage::ProcessingResults(biometrics.clone());
                let profile = self.save_plan(user, biometrics).await?;
                draft.reset();
                draft.stage = Stage::MainMenu;
                Ok(vec![
                    prompts::plan_summary(&profile.biometrics, &profile.plan),
                    prompts::main_menu(),
                ])
            }
            Step::UpdateWeight(biometrics) => {
                let weight = biometrics.weight;
                let profile = self.save_plan(user, biometrics).await?;
                draft.stage = Stage::MainMenu;
                Ok(vec![
                    prompts::weight_updated(weight),
                    prompts::profile_card(&profile),
                    prompts::main_menu(),
                ])
            }
            Step::Dispatch(command) => self.run_command(draft, user, command).await,
            Step::Unhandled => {
                warn!(
                    user_id = user.external_id,
                    state = %draft.state(),
                    "No transition for state"
                );
                Ok(vec![prompts::restart_notice()])
            }
        }
    }

    async fn run_command(
        &self,
        draft: &mut Session,
        user: &TurnUser<'_>,
        command: Command,
    ) -> Result<Vec<OutgoingResponse>, DialogError> {
        debug!(user_id = user.external_id, command = command.name(), "Command");

        match command {
            Command::Start => {
                draft.reset();
                let has_profile = self
                    .store
                    .has_profile(user.external_id)
                    .await
                    .map_err(DialogError::persistence(FailurePoint::ProfileLookup))?;
                if has_profile {
                    draft.stage = Stage::MainMenu;
                    Ok(vec![prompts::main_menu()])
                } else {
                    draft.stage = Stage::AskingGender;
                    Ok(vec![prompts::gender_prompt()])
                }
            }
            Command::Cancel => {
                draft.reset();
                draft.stage = Stage::MainMenu;
                Ok(vec![prompts::dialog_cancelled(), prompts::main_menu()])
            }
            Command::Profile => {
                let latest = self.latest_profile(user).await?;
                let card = match latest {
                    Some(profile) => prompts::profile_card(&profile),
                    None => prompts::profile_not_found(),
                };
                draft.stage = Stage::MainMenu;
                Ok(vec![card, prompts::main_menu()])
            }
            Command::UpdateWeight => match self.latest_profile(user).await? {
                Some(profile) => {
                    let current = profile.biometrics.weight;
                    draft.load_for_weight_update(profile.biometrics);
                    Ok(vec![prompts::weight_update_prompt(current)])
                }
                None => Ok(vec![prompts::profile_required()]),
            },
            Command::NewPlan => {
                draft.reset();
                draft.stage = Stage::AskingGender;
                Ok(vec![prompts::gender_prompt()])
            }
            Command::Exercises => {
                draft.stage = Stage::ShowingExercisesMenu;
                Ok(vec![prompts::exercises_menu()])
            }
            Command::Unknown(name) => {
                info!(user_id = user.external_id, command = %name, "Unknown command");
                draft.stage = Stage::MainMenu;
                Ok(vec![prompts::unknown_command(), prompts::main_menu()])
            }
        }
    }

    async fn latest_profile(&self, user: &TurnUser<'_>) -> Result<Option<Profile>, DialogError> {
        self.store
            .get_latest_parameters(user.external_id)
            .await
            .map_err(DialogError::persistence(FailurePoint::ProfileLookup))
    }

    /// Compute a plan for `biometrics` and append it to the user's history.
    async fn save_plan(
        &self,
        user: &TurnUser<'_>,
        biometrics: Biometrics,
    ) -> Result<Profile, DialogError> {
        let plan = compute_plan(&biometrics);
        let profile = Profile::new(biometrics, plan);
        self.store
            .save_parameters(user.id, &profile)
            .await
            .map_err(DialogError::persistence(FailurePoint::PlanSave))?;
        info!(
            user_id = user.external_id,
            daily_calories = profile.plan.daily_calories,
            goal = %profile.biometrics.goal,
            "Plan saved"
        );
        Ok(profile)
    }
}

/// Display-name parts forwarded by the channel.
fn user_info(msg: &IncomingMessage) -> UserInfo {
    let field = |key: &str| msg.metadata_str(key).map(str::to_string);
    UserInfo {
        username: field("username"),
        first_name: field("first_name"),
        last_name: field("last_name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::state::ConversationState;
    use crate::store::LibSqlBackend;

    async fn controller() -> DialogController {
        let store = LibSqlBackend::new_memory().await.unwrap();
        DialogController::new(Arc::new(store), SessionStore::new())
    }

    async fn send(c: &DialogController, text: &str) -> Vec<OutgoingResponse> {
        c.handle(&IncomingMessage::new("test", "u1", text)).await
    }

    async fn state(c: &DialogController) -> ConversationState {
        c.sessions().acquire("u1").await.state()
    }

    #[test]
    fn user_info_from_metadata() {
        let msg = IncomingMessage::new("telegram", "1", "x").with_metadata(serde_json::json!({
            "username": "alice",
            "first_name": "Alice",
            "last_name": "",
        }));
        assert_eq!(
            user_info(&msg),
            UserInfo {
                username: Some("alice".into()),
                first_name: Some("Alice".into()),
                last_name: None,
            }
        );
        assert_eq!(
            user_info(&IncomingMessage::new("cli", "1", "x")),
            UserInfo::default()
        );
    }

    #[tokio::test]
    async fn first_message_asks_gender() {
        let c = controller().await;
        let replies = send(&c, "привет").await;
        assert_eq!(replies, vec![prompts::gender_prompt()]);
        assert_eq!(state(&c).await, ConversationState::AskingGender);
    }

    #[tokio::test]
    async fn start_without_profile_begins_intake() {
        let c = controller().await;
        assert_eq!(send(&c, "/start").await, vec![prompts::gender_prompt()]);
        assert_eq!(state(&c).await, ConversationState::AskingGender);
    }

    #[tokio::test]
    async fn cancel_resets_and_shows_menu() {
        let c = controller().await;
        send(&c, "/start").await;
        send(&c, "Женский").await;
        let replies = send(&c, "/cancel").await;
        assert_eq!(
            replies,
            vec![prompts::dialog_cancelled(), prompts::main_menu()]
        );
        let session = c.sessions().acquire("u1").await;
        assert_eq!(session.state(), ConversationState::MainMenu);
        assert_eq!(session.answers().gender, None);
    }

    #[tokio::test]
    async fn unknown_command_shows_menu() {
        let c = controller().await;
        let replies = send(&c, "/help").await;
        assert_eq!(replies, vec![prompts::unknown_command(), prompts::main_menu()]);
        assert_eq!(state(&c).await, ConversationState::MainMenu);
    }

    #[tokio::test]
    async fn exercises_command_opens_submenu() {
        let c = controller().await;
        assert_eq!(send(&c, "/exercises").await, vec![prompts::exercises_menu()]);
        assert_eq!(state(&c).await, ConversationState::ShowingExercisesMenu);

        send(&c, "↩️ Назад в меню").await;
        assert_eq!(state(&c).await, ConversationState::MainMenu);
    }

    #[tokio::test]
    async fn menu_cancel_closes_menu() {
        let c = controller().await;
        send(&c, "/cancel").await;
        assert_eq!(send(&c, "❌ Отмена").await, vec![prompts::menu_closed()]);
        assert_eq!(state(&c).await, ConversationState::Start);
    }

    #[tokio::test]
    async fn profile_command_without_profile() {
        let c = controller().await;
        let replies = send(&c, "/profile").await;
        assert_eq!(replies, vec![prompts::profile_not_found(), prompts::main_menu()]);
    }
}
