//! Store abstraction: two-table SQLite CRUD with JSON-valued text columns.
//! Directory creation, WAL-mode `SqliteConnectOptions`, and `PoolOptions`
//! set up the connection; `#[instrument]` and `thiserror` carry the same
//! conventions used throughout the workspace.

use chrono::Utc;
use sensecap_types::{InferencePayload, NotificationEventRecord, ModelKind, SensorPayload, TaskFlowRecord};
use sqlx::pool::PoolOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("database migration failed: {0}")]
    MigrationFailed(String),

    #[error("database query failed: {0}")]
    QueryFailed(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("no row with id {0}")]
    NotFound(i64),

    #[error("invalid data format: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        DbError::QueryFailed(error.to_string())
    }
}

impl From<std::io::Error> for DbError {
    fn from(error: std::io::Error) -> Self {
        DbError::IoError(error.to_string())
    }
}

fn model_kind_to_i64(kind: ModelKind) -> i64 {
    kind.as_i32() as i64
}

fn model_kind_from_i64(value: i64) -> ModelKind {
    match value {
        1 => ModelKind::Person,
        2 => ModelKind::Pet,
        3 => ModelKind::Gesture,
        _ => ModelKind::Cloud,
    }
}

/// Initializes the SQLite connection pool and creates the schema this
/// system needs if it is not already present.
#[instrument]
pub async fn init_db(db_url: &str) -> Result<SqlitePool, DbError> {
    if db_url.starts_with("sqlite:") {
        let file_path = db_url.trim_start_matches("sqlite:");
        if let Some(parent) = Path::new(file_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("creating directory structure for database: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }
    }

    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("database not found, creating new one at {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
    } else {
        info!("using existing database at {}", db_url);
    }

    let connection_options = SqliteConnectOptions::from_str(db_url)
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = PoolOptions::new()
        .max_connections(5)
        .connect_with(connection_options)
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    info!("database pool created, running migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_flow (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id TEXT NOT NULL,
            name TEXT NOT NULL,
            headline TEXT NOT NULL,
            trigger_phrase TEXT NOT NULL,
            target_objects TEXT NOT NULL,
            actions TEXT NOT NULL,
            model_kind INTEGER NOT NULL,
            created_at_ms INTEGER NOT NULL,
            updated_at_ms INTEGER NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await
    .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_task_flow_device_id ON task_flow (device_id);")
        .execute(&pool)
        .await
        .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notification_event (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_id TEXT NOT NULL,
            device_id TEXT NOT NULL,
            event_timestamp_ms INTEGER NOT NULL,
            text TEXT NOT NULL,
            img TEXT,
            inference_data TEXT,
            sensor_data TEXT,
            received_at_ms INTEGER NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await
    .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notification_event_device_id ON notification_event (device_id);",
    )
    .execute(&pool)
    .await
    .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notification_event_timestamp ON notification_event (event_timestamp_ms);",
    )
    .execute(&pool)
    .await
    .map_err(|e| DbError::MigrationFailed(e.to_string()))?;

    info!("store schema ready");
    Ok(pool)
}

fn row_to_task_flow(row: &sqlx::sqlite::SqliteRow) -> Result<TaskFlowRecord, DbError> {
    let target_objects_text: String = row.try_get("target_objects")?;
    let actions_text: String = row.try_get("actions")?;
    Ok(TaskFlowRecord {
        id: Some(row.try_get::<i64, _>("id")?),
        device_id: row.try_get("device_id")?,
        name: row.try_get("name")?,
        headline: row.try_get("headline")?,
        trigger: row.try_get("trigger_phrase")?,
        target_objects: serde_json::from_str(&target_objects_text)
            .map_err(|e| DbError::InvalidData(e.to_string()))?,
        actions: serde_json::from_str(&actions_text)
            .map_err(|e| DbError::InvalidData(e.to_string()))?,
        model_kind: model_kind_from_i64(row.try_get("model_kind")?),
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

/// Inserts a new task flow, stamping surrogate id and creation/update
/// timestamps. Does not delete prior flows for the device; callers that
/// need supersession call [`delete_task_flow`] per id first (see
/// `sensecap_core::taskflow::compile`).
#[instrument(skip(pool, record), fields(device_id = %record.device_id))]
pub async fn save_task_flow(
    pool: &SqlitePool,
    record: TaskFlowRecord,
) -> Result<TaskFlowRecord, DbError> {
    let now_ms = Utc::now().timestamp_millis();
    let target_objects_text = serde_json::to_string(&record.target_objects)
        .map_err(|e| DbError::InvalidData(e.to_string()))?;
    let actions_text =
        serde_json::to_string(&record.actions).map_err(|e| DbError::InvalidData(e.to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO task_flow
            (device_id, name, headline, trigger_phrase, target_objects, actions, model_kind, created_at_ms, updated_at_ms)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.device_id)
    .bind(&record.name)
    .bind(&record.headline)
    .bind(&record.trigger)
    .bind(&target_objects_text)
    .bind(&actions_text)
    .bind(model_kind_to_i64(record.model_kind))
    .bind(now_ms)
    .bind(now_ms)
    .execute(pool)
    .await?;

    Ok(TaskFlowRecord {
        id: Some(result.last_insert_rowid()),
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
        ..record
    })
}

/// Newest-first list of task flows for one device.
#[instrument(skip(pool))]
pub async fn get_task_flows_by_device(
    pool: &SqlitePool,
    device_id: &str,
) -> Result<Vec<TaskFlowRecord>, DbError> {
    let rows = sqlx::query(
        "SELECT * FROM task_flow WHERE device_id = ? ORDER BY created_at_ms DESC",
    )
    .bind(device_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_task_flow).collect()
}

/// Looks up one task flow by surrogate id.
#[instrument(skip(pool))]
pub async fn get_task_flow_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<TaskFlowRecord>, DbError> {
    let row = sqlx::query("SELECT * FROM task_flow WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_task_flow).transpose()
}

/// Deletes one task flow by id. Fails with [`DbError::NotFound`] if no row
/// was affected.
#[instrument(skip(pool))]
pub async fn delete_task_flow(pool: &SqlitePool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM task_flow WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(id));
    }
    Ok(())
}

/// Deletes all task flows for a device, ignoring the zero-rows case (a
/// device with no prior flows is not an error).
#[instrument(skip(pool))]
pub async fn delete_task_flows_by_device(pool: &SqlitePool, device_id: &str) -> Result<(), DbError> {
    sqlx::query("DELETE FROM task_flow WHERE device_id = ?")
        .bind(device_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Inserts a notification event, stamping surrogate id and server reception
/// instant. Events are append-only; there is no update/delete operation.
#[instrument(skip(pool, record), fields(device_id = %record.device_id))]
pub async fn save_notification_event(
    pool: &SqlitePool,
    record: NotificationEventRecord,
) -> Result<NotificationEventRecord, DbError> {
    let received_at_ms = Utc::now().timestamp_millis();
    let inference_text = record
        .inference
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DbError::InvalidData(e.to_string()))?;
    let sensor_text = record
        .sensor
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DbError::InvalidData(e.to_string()))?;

    let result = sqlx::query(
        r#"
        INSERT INTO notification_event
            (request_id, device_id, event_timestamp_ms, text, img, inference_data, sensor_data, received_at_ms)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.request_id)
    .bind(&record.device_id)
    .bind(record.event_timestamp_ms)
    .bind(&record.text)
    .bind(&record.img)
    .bind(&inference_text)
    .bind(&sensor_text)
    .bind(received_at_ms)
    .execute(pool)
    .await?;

    Ok(NotificationEventRecord {
        id: Some(result.last_insert_rowid()),
        received_at_ms,
        ..record
    })
}

fn row_to_notification_event(row: &sqlx::sqlite::SqliteRow) -> Result<NotificationEventRecord, DbError> {
    let inference_text: Option<String> = row.try_get("inference_data")?;
    let sensor_text: Option<String> = row.try_get("sensor_data")?;

    let inference: Option<InferencePayload> = inference_text
        .map(|t| serde_json::from_str(&t))
        .transpose()
        .map_err(|e| DbError::InvalidData(e.to_string()))?;
    let sensor: Option<SensorPayload> = sensor_text
        .map(|t| serde_json::from_str(&t))
        .transpose()
        .map_err(|e| DbError::InvalidData(e.to_string()))?;

    Ok(NotificationEventRecord {
        id: Some(row.try_get::<i64, _>("id")?),
        request_id: row.try_get("request_id")?,
        device_id: row.try_get("device_id")?,
        event_timestamp_ms: row.try_get("event_timestamp_ms")?,
        text: row.try_get("text")?,
        img: row.try_get("img")?,
        inference,
        sensor,
        received_at_ms: row.try_get("received_at_ms")?,
    })
}

/// Newest-first list of notification events for one device, capped at
/// `limit` rows.
#[instrument(skip(pool))]
pub async fn get_notification_events_by_device(
    pool: &SqlitePool,
    device_id: &str,
    limit: i64,
) -> Result<Vec<NotificationEventRecord>, DbError> {
    let rows = sqlx::query(
        "SELECT * FROM notification_event WHERE device_id = ? ORDER BY received_at_ms DESC LIMIT ?",
    )
    .bind(device_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_notification_event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashMap;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("failed to connect to in-memory db");
        init_schema(&pool).await;
        pool
    }

    // init_db() itself goes through Sqlite::database_exists/create_database,
    // which does not apply to `sqlite::memory:` pools opened directly via
    // SqlitePoolOptions; tests create the schema inline instead.
    async fn init_schema(pool: &SqlitePool) {
        sqlx::query(
            r#"
            CREATE TABLE task_flow (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                name TEXT NOT NULL,
                headline TEXT NOT NULL,
                trigger_phrase TEXT NOT NULL,
                target_objects TEXT NOT NULL,
                actions TEXT NOT NULL,
                model_kind INTEGER NOT NULL,
                created_at_ms INTEGER NOT NULL,
                updated_at_ms INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE notification_event (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                request_id TEXT NOT NULL,
                device_id TEXT NOT NULL,
                event_timestamp_ms INTEGER NOT NULL,
                text TEXT NOT NULL,
                img TEXT,
                inference_data TEXT,
                sensor_data TEXT,
                received_at_ms INTEGER NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn sample_flow(device_id: &str, name: &str) -> TaskFlowRecord {
        TaskFlowRecord {
            id: None,
            device_id: device_id.to_string(),
            name: name.to_string(),
            headline: "Watch for person".to_string(),
            trigger: "person arrives".to_string(),
            target_objects: vec!["person".to_string()],
            actions: vec!["notify".to_string()],
            model_kind: ModelKind::Person,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    #[tokio::test]
    async fn task_flow_supersession() {
        let pool = memory_pool().await;
        let device_id = "2CF7F1C04430000C";

        let t1 = save_task_flow(&pool, sample_flow(device_id, "first")).await.unwrap();
        delete_task_flows_by_device(&pool, device_id).await.unwrap();
        let t2 = save_task_flow(&pool, sample_flow(device_id, "second")).await.unwrap();

        let flows = get_task_flows_by_device(&pool, device_id).await.unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].id, t2.id);
        assert_ne!(flows[0].id, t1.id);
    }

    #[tokio::test]
    async fn delete_missing_task_flow_is_not_found() {
        let pool = memory_pool().await;
        let err = delete_task_flow(&pool, 999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(999)));
    }

    #[tokio::test]
    async fn notification_event_roundtrips_inference_payload() {
        let pool = memory_pool().await;
        let payload = InferencePayload::Detection {
            boxes: vec![(1.0, 2.0, 3.0, 4.0, 91, 0), (5.0, 6.0, 7.0, 8.0, 88, 14)],
            classes: HashMap::from([("0".to_string(), "person".to_string())]),
        };
        let record = NotificationEventRecord {
            id: None,
            request_id: "req-1".to_string(),
            device_id: "2CF7F1C04430000C".to_string(),
            event_timestamp_ms: 123,
            text: "motion detected".to_string(),
            img: None,
            inference: Some(payload.clone()),
            sensor: None,
            received_at_ms: 0,
        };

        save_notification_event(&pool, record).await.unwrap();

        let rows = get_notification_events_by_device(&pool, "2CF7F1C04430000C", 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inference, Some(payload));
    }
}
