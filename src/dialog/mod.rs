//! Conversation state machine: commands, menus, transitions and the
//! controller that runs them against storage.

pub mod commands;
pub mod controller;
pub mod menu;
pub mod prompts;
pub mod state;
pub mod transitions;

pub use commands::{Command, CommandParser};
pub use controller::DialogController;
pub use state::{ConversationState, Session, Stage};
