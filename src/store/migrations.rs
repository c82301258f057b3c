//! Schema for the profile store.
//!
//! Applied versions are recorded in `_migrations`; startup applies whatever
//! is newer than the highest recorded version, in order.

use libsql::Connection;

use crate::error::DatabaseError;

/// One schema version.
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ascending by version.
static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "users_and_parameters",
    sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_id TEXT NOT NULL UNIQUE,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_parameters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            age INTEGER NOT NULL CHECK (age > 0 AND age < 120),
            weight REAL NOT NULL CHECK (weight > 0 AND weight < 300),
            height INTEGER NOT NULL CHECK (height > 0 AND height < 250),
            goal TEXT NOT NULL
                CHECK (goal IN ('weight_loss', 'maintenance', 'weight_gain')),
            activity_level TEXT NOT NULL
                CHECK (activity_level IN ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            daily_calories INTEGER NOT NULL,
            protein_goal INTEGER NOT NULL,
            fat_goal INTEGER NOT NULL,
            carbs_goal INTEGER NOT NULL,
            workout_plan TEXT NOT NULL,
            diet_advice TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_user_parameters_user_created
            ON user_parameters(user_id, created_at);
    "#,
}];

/// Bring the schema on `conn` up to the newest version.
pub async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        (),
    )
    .await
    .map_err(|e| DatabaseError::Migration(format!("cannot create version table: {e}")))?;

    let applied = current_version(conn).await?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
    if pending.is_empty() {
        tracing::debug!(version = applied, "Schema up to date");
        return Ok(());
    }

    for m in pending {
        tracing::info!(version = m.version, name = m.name, "Upgrading schema");
        conn.execute_batch(m.sql).await.map_err(|e| {
            DatabaseError::Migration(format!("V{} {}: {e}", m.version, m.name))
        })?;
        record_version(conn, m).await?;
    }

    let version = current_version(conn).await?;
    tracing::info!(version, "Schema upgraded");
    Ok(())
}

/// Highest recorded version; 0 on a fresh database.
async fn current_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let version_err = |e: libsql::Error| DatabaseError::Migration(format!("schema version: {e}"));

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM _migrations", ())
        .await
        .map_err(version_err)?;
    match rows.next().await.map_err(version_err)? {
        Some(row) => row.get::<i64>(0).map_err(version_err),
        None => Ok(0),
    }
}

async fn record_version(conn: &Connection, m: &Migration) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO _migrations (version, name) VALUES (?1, ?2)",
        libsql::params![m.version, m.name],
    )
    .await
    .map(|_| ())
    .map_err(|e| DatabaseError::Migration(format!("cannot record V{}: {e}", m.version)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fresh() -> Connection {
        let db = libsql::Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();
        run_migrations(&conn).await.unwrap();
        conn
    }

    async fn table_exists(conn: &Connection, table: &str) -> bool {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                libsql::params![table],
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        row.get::<i64>(0).unwrap() == 1
    }

    async fn insert_user(conn: &Connection) {
        conn.execute(
            "INSERT INTO users (external_id, created_at) VALUES ('u1', '2026-01-01T00:00:00Z')",
            (),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn creates_tables() {
        let conn = fresh().await;

        for table in ["users", "user_parameters", "_migrations"] {
            assert!(table_exists(&conn, table).await, "Table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn rerun_is_noop() {
        let conn = fresh().await;
        run_migrations(&conn).await.unwrap();
        assert_eq!(current_version(&conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn records_applied_version() {
        let conn = fresh().await;

        let mut rows = conn
            .query("SELECT version, name FROM _migrations ORDER BY version", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
        assert_eq!(row.get::<String>(1).unwrap(), "users_and_parameters");
        assert!(rows.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn external_id_is_unique() {
        let conn = fresh().await;
        insert_user(&conn).await;

        let dup = conn
            .execute(
                "INSERT INTO users (external_id, created_at) VALUES ('u1', '2026-01-02T00:00:00Z')",
                (),
            )
            .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn parameter_checks_reject_out_of_range() {
        let conn = fresh().await;
        insert_user(&conn).await;

        let insert = |age: i64, weight: f64, goal: &'static str| {
            let conn = conn.clone();
            async move {
                conn.execute(
                    "INSERT INTO user_parameters (user_id, gender, age, weight, height, goal,
                        activity_level, daily_calories, protein_goal, fat_goal, carbs_goal,
                        workout_plan, diet_advice, created_at)
                     VALUES (1, 'male', ?1, ?2, 180, ?3, 'moderate', 2759, 176, 80, 333,
                        'w', 'd', '2026-01-01T00:00:00Z')",
                    libsql::params![age, weight, goal],
                )
                .await
            }
        };

        assert!(insert(30, 80.0, "maintenance").await.is_ok());
        assert!(insert(120, 80.0, "maintenance").await.is_err());
        assert!(insert(30, 300.0, "maintenance").await.is_err());
        assert!(insert(30, 80.0, "bulking").await.is_err());
    }
}
