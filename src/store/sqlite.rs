//! SQLite-based storage implementation

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    BindingStore, ConfigStore, DeviceId, Placement, Session, SessionStore, SessionToken,
    StoreResult, UserConfig, UserId,
};
use crate::crypto::generate_session_token;
use crate::error::GatewayError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

const CONFIG_COLUMNS: &str = "user_id, \
    twitter_x, twitter_y, twitter_w, twitter_h, \
    gmail_x, gmail_y, gmail_w, gmail_h, \
    tasks_x, tasks_y, tasks_w, tasks_h";

/// SQLite-based store implementing the binding, layout and session stores
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database. Accepts a plain path or a `sqlite://` URL.
    pub fn open(url: &str) -> Result<Self, GatewayError> {
        let path = url.strip_prefix("sqlite://").unwrap_or(url);
        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), GatewayError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, GatewayError> {
        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        Ok(conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })?)
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), GatewayError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Devices may be bound to many users and vice versa
            CREATE TABLE IF NOT EXISTS device_user (
                device_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                PRIMARY KEY (device_id, user_id)
            );

            -- One session per user
            CREATE TABLE IF NOT EXISTS sessions (
                user_id INTEGER PRIMARY KEY,
                token TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            -- Dashboard layout; NULL width means the widget is disabled
            CREATE TABLE IF NOT EXISTS config (
                user_id INTEGER PRIMARY KEY,
                twitter_x INTEGER, twitter_y INTEGER, twitter_w INTEGER, twitter_h INTEGER,
                gmail_x INTEGER, gmail_y INTEGER, gmail_w INTEGER, gmail_h INTEGER,
                tasks_x INTEGER, tasks_y INTEGER, tasks_w INTEGER, tasks_h INTEGER
            );
            "#,
        )?;

        Ok(())
    }

    fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
        let user_id: i64 = row.get(0)?;
        let token: String = row.get(1)?;
        let created_at: String = row.get(2)?;
        Ok(Session {
            user_id: UserId(user_id),
            token: SessionToken(token),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
                })?,
        })
    }

    fn config_from_row(row: &Row<'_>) -> rusqlite::Result<UserConfig> {
        let placement = |offset: usize| -> rusqlite::Result<Placement> {
            let field = |i: usize| -> rusqlite::Result<i64> {
                Ok(row.get::<_, Option<i64>>(offset + i)?.unwrap_or(0))
            };
            Ok(Placement::new(field(0)?, field(1)?, field(2)?, field(3)?))
        };
        let user_id: i64 = row.get(0)?;
        Ok(UserConfig {
            user_id: UserId(user_id),
            twitter: placement(1)?,
            gmail: placement(5)?,
            tasks: placement(9)?,
        })
    }
}

impl BindingStore for SqliteStore {
    fn bind(&self, device_id: DeviceId, user_id: UserId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO device_user (device_id, user_id) VALUES (?1, ?2)",
            params![device_id.0, user_id.0],
        )?;
        Ok(())
    }

    fn users_for_device(&self, device_id: DeviceId) -> StoreResult<Vec<UserId>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT user_id FROM device_user WHERE device_id = ?1 ORDER BY user_id",
        )?;

        let users = stmt
            .query_map(params![device_id.0], |row| {
                let id: i64 = row.get(0)?;
                Ok(UserId(id))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}

impl ConfigStore for SqliteStore {
    fn put_config(&self, config: &UserConfig) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let (t, g, k) = (config.twitter, config.gmail, config.tasks);

        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO config ({}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                CONFIG_COLUMNS
            ),
            params![
                config.user_id.0,
                t.x, t.y, t.w, t.h,
                g.x, g.y, g.w, g.h,
                k.x, k.y, k.w, k.h,
            ],
        )?;

        Ok(())
    }

    fn get_config(&self, user_id: UserId) -> StoreResult<Option<UserConfig>> {
        let conn = self.conn.lock().unwrap();

        Ok(conn
            .query_row(
                &format!("SELECT {} FROM config WHERE user_id = ?1", CONFIG_COLUMNS),
                params![user_id.0],
                Self::config_from_row,
            )
            .optional()?)
    }
}

impl SessionStore for SqliteStore {
    fn issue(&self, user_id: UserId) -> StoreResult<Session> {
        let mut conn = self.conn.lock().unwrap();
        let session = Session {
            user_id,
            token: SessionToken(generate_session_token()),
            created_at: Utc::now(),
        };

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO sessions (user_id, token, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET token = excluded.token, created_at = excluded.created_at",
            params![
                user_id.0,
                session.token.0,
                session.created_at.to_rfc3339()
            ],
        )?;
        tx.commit()?;

        Ok(session)
    }

    fn get_by_token(&self, token: &SessionToken) -> StoreResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();

        Ok(conn
            .query_row(
                "SELECT user_id, token, created_at FROM sessions WHERE token = ?1",
                params![token.0],
                Self::session_from_row,
            )
            .optional()?)
    }

    fn get_for_user(&self, user_id: UserId) -> StoreResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();

        Ok(conn
            .query_row(
                "SELECT user_id, token, created_at FROM sessions WHERE user_id = ?1",
                params![user_id.0],
                Self::session_from_row,
            )
            .optional()?)
    }

    fn delete(&self, token: &SessionToken) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected =
            conn.execute("DELETE FROM sessions WHERE token = ?1", params![token.0])?;
        Ok(rows_affected > 0)
    }
}

impl BindingStore for Arc<SqliteStore> {
    fn bind(&self, device_id: DeviceId, user_id: UserId) -> StoreResult<()> {
        (**self).bind(device_id, user_id)
    }

    fn users_for_device(&self, device_id: DeviceId) -> StoreResult<Vec<UserId>> {
        (**self).users_for_device(device_id)
    }
}

impl ConfigStore for Arc<SqliteStore> {
    fn put_config(&self, config: &UserConfig) -> StoreResult<()> {
        (**self).put_config(config)
    }

    fn get_config(&self, user_id: UserId) -> StoreResult<Option<UserConfig>> {
        (**self).get_config(user_id)
    }
}

impl SessionStore for Arc<SqliteStore> {
    fn issue(&self, user_id: UserId) -> StoreResult<Session> {
        (**self).issue(user_id)
    }

    fn get_by_token(&self, token: &SessionToken) -> StoreResult<Option<Session>> {
        (**self).get_by_token(token)
    }

    fn get_for_user(&self, user_id: UserId) -> StoreResult<Option<Session>> {
        (**self).get_for_user(user_id)
    }

    fn delete(&self, token: &SessionToken) -> StoreResult<bool> {
        (**self).delete(token)
    }
}
