//! In-memory conversation sessions.

mod store;

pub use store::{SessionHandle, SessionStore};
