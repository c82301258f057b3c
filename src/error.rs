//! Error types for the fitness bot.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },
}

/// A user answer that fails a field constraint.
///
/// Never propagated past the dialog: the caller re-prompts for the same field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must be greater than {min} and less than {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field}: '{input}' is not one of the offered options")]
    UnknownLabel { field: &'static str, input: String },
}

/// Where in a turn a persistence call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    /// Registering the user at the start of a turn.
    Registration,
    /// Reading the latest saved profile.
    ProfileLookup,
    /// Saving a freshly computed plan.
    PlanSave,
}

impl std::fmt::Display for FailurePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Registration => "registration",
            Self::ProfileLookup => "profile_lookup",
            Self::PlanSave => "plan_save",
        };
        write!(f, "{s}")
    }
}

/// Errors that abort a single dialog turn without committing it.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Persistence failed during {point}: {source}")]
    Persistence {
        point: FailurePoint,
        #[source]
        source: DatabaseError,
    },

    #[error("Turn for user {user_id} timed out after {secs}s")]
    Timeout { user_id: String, secs: u64 },
}

impl DialogError {
    pub fn persistence(point: FailurePoint) -> impl FnOnce(DatabaseError) -> Self {
        move |source| Self::Persistence { point, source }
    }
}
