//! libSQL backend for [`ProfileStore`]. Supports local file and in-memory
//! databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::profile::{Biometrics, Plan, Profile};
use crate::store::migrations;
use crate::store::traits::{ProfileStore, UserInfo};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db).await?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db).await?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        // SQLite leaves foreign keys off per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to enable foreign keys: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Number of saved profiles for a user.
    pub async fn parameter_count(&self, external_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*) FROM user_parameters p
                 JOIN users u ON u.id = p.user_id
                 WHERE u.external_id = ?1",
                params![external_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("parameter_count: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map_err(|e| DatabaseError::Query(format!("parameter_count row parse: {e}"))),
            Ok(None) => Ok(0),
            Err(e) => Err(DatabaseError::Query(format!("parameter_count: {e}"))),
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so lexical order matches chronological order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| DatabaseError::Query(format!("invalid created_at '{s}': {e}")))
}

/// Convert `Option<&str>` to libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn row_err(e: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Query(format!("user_parameters row parse: {e}"))
}

/// Map a libsql Row (selected with [`PARAMETER_COLUMNS`]) to a Profile.
fn row_to_profile(row: &libsql::Row) -> Result<Profile, DatabaseError> {
    let gender: String = row.get(0).map_err(row_err)?;
    let age: i64 = row.get(1).map_err(row_err)?;
    let height: i64 = row.get(3).map_err(row_err)?;
    let goal: String = row.get(4).map_err(row_err)?;
    let activity: String = row.get(5).map_err(row_err)?;
    let created_at: String = row.get(12).map_err(row_err)?;

    let biometrics = Biometrics {
        gender: gender.parse().map_err(row_err)?,
        age: u32::try_from(age).map_err(row_err)?,
        weight: row.get(2).map_err(row_err)?,
        height: u32::try_from(height).map_err(row_err)?,
        goal: goal.parse().map_err(row_err)?,
        activity_level: activity.parse().map_err(row_err)?,
    };
    let int_col = |idx: i32| -> Result<i32, DatabaseError> {
        let v: i64 = row.get(idx).map_err(row_err)?;
        i32::try_from(v).map_err(row_err)
    };
    let plan = Plan {
        daily_calories: int_col(6)?,
        protein_goal: int_col(7)?,
        fat_goal: int_col(8)?,
        carbs_goal: int_col(9)?,
        workout_plan: row.get(10).map_err(row_err)?,
        diet_advice: row.get(11).map_err(row_err)?,
    };

    Ok(Profile {
        biometrics,
        plan,
        created_at: parse_datetime(&created_at)?,
    })
}

// ── Trait implementation ────────────────────────────────────────────

const PARAMETER_COLUMNS: &str = "p.gender, p.age, p.weight, p.height, p.goal, p.activity_level, \
     p.daily_calories, p.protein_goal, p.fat_goal, p.carbs_goal, p.workout_plan, p.diet_advice, \
     p.created_at";

#[async_trait]
impl ProfileStore for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn get_or_create_user(
        &self,
        external_id: &str,
        info: &UserInfo,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        let now = format_datetime(&Utc::now());

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO users (external_id, username, first_name, last_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    external_id,
                    opt_text(info.username.as_deref()),
                    opt_text(info.first_name.as_deref()),
                    opt_text(info.last_name.as_deref()),
                    now
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_or_create_user insert: {e}")))?;

        let mut rows = conn
            .query(
                "SELECT id FROM users WHERE external_id = ?1",
                params![external_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_or_create_user: {e}")))?;

        let id = match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map_err(|e| DatabaseError::Query(format!("get_or_create_user row parse: {e}")))?,
            Ok(None) => {
                return Err(DatabaseError::NotFound {
                    entity: "user".to_string(),
                    id: external_id.to_string(),
                });
            }
            Err(e) => return Err(DatabaseError::Query(format!("get_or_create_user: {e}"))),
        };

        if inserted > 0 {
            debug!(external_id, user_id = id, "User created");
        }
        Ok(id)
    }

    async fn save_parameters(&self, user_id: i64, profile: &Profile) -> Result<(), DatabaseError> {
        let b = &profile.biometrics;
        let plan = &profile.plan;

        self.conn()
            .execute(
                "INSERT INTO user_parameters (user_id, gender, age, weight, height, goal,
                    activity_level, daily_calories, protein_goal, fat_goal, carbs_goal,
                    workout_plan, diet_advice, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    user_id,
                    b.gender.as_str(),
                    i64::from(b.age),
                    b.weight,
                    i64::from(b.height),
                    b.goal.as_str(),
                    b.activity_level.as_str(),
                    i64::from(plan.daily_calories),
                    i64::from(plan.protein_goal),
                    i64::from(plan.fat_goal),
                    i64::from(plan.carbs_goal),
                    plan.workout_plan.as_str(),
                    plan.diet_advice.as_str(),
                    format_datetime(&profile.created_at)
                ],
            )
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("CHECK constraint") || msg.contains("FOREIGN KEY") {
                    DatabaseError::Constraint(format!("save_parameters: {msg}"))
                } else {
                    DatabaseError::Query(format!("save_parameters: {msg}"))
                }
            })?;

        debug!(
            user_id,
            daily_calories = plan.daily_calories,
            "Profile saved"
        );
        Ok(())
    }

    async fn get_latest_parameters(
        &self,
        external_id: &str,
    ) -> Result<Option<Profile>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {PARAMETER_COLUMNS} FROM user_parameters p
                     JOIN users u ON u.id = p.user_id
                     WHERE u.external_id = ?1
                     ORDER BY p.created_at DESC, p.id DESC
                     LIMIT 1"
                ),
                params![external_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_latest_parameters: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_profile(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_latest_parameters: {e}"))),
        }
    }

    async fn has_profile(&self, external_id: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT EXISTS (
                    SELECT 1 FROM user_parameters p
                    JOIN users u ON u.id = p.user_id
                    WHERE u.external_id = ?1
                 )",
                params![external_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("has_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let exists: i64 = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("has_profile row parse: {e}")))?;
                Ok(exists != 0)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(DatabaseError::Query(format!("has_profile: {e}"))),
        }
    }
}
