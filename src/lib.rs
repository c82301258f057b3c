//! Fitness Bot: a Telegram intake dialog that turns a user's biometrics into
//! a calorie, macro and training plan.

pub mod bot;
pub mod channels;
pub mod config;
pub mod dialog;
pub mod error;
pub mod profile;
pub mod session;
pub mod store;
