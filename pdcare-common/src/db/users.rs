//! SQLite-backed accounts and sessions

use chrono::{Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::session::{
    generate_salt, hash_password, verify_password, Registration, Session, SessionManager,
    UserAccount,
};
use crate::{Error, Result};

/// Session manager persisting accounts and sessions in SQLite
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
    session_ttl: Duration,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool, session_ttl_hours: u32) -> Self {
        Self {
            pool,
            session_ttl: Duration::hours(i64::from(session_ttl_hours)),
        }
    }

    /// Override the session lifetime
    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Remove every expired session, returning how many were deleted
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let now = format_timestamp(Utc::now());
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn user_from_row(row: &SqliteRow) -> Result<UserAccount> {
        let guid: String = row.get("guid");
        let created_at: String = row.get("created_at");
        Ok(UserAccount {
            id: parse_uuid("users.guid", &guid)?,
            username: row.get("username"),
            email: row.get("email"),
            created_at: parse_timestamp("users.created_at", &created_at)?,
        })
    }
}

impl SessionManager for SqliteSessionStore {
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount> {
        let registration = Registration::validate(username, email, password)?;

        let existing: Option<(String,)> = sqlx::query_as("SELECT guid FROM users WHERE email = ?")
            .bind(&registration.email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::AlreadyExists(
                "User with this email already exists".to_string(),
            ));
        }

        let user = UserAccount {
            id: Uuid::new_v4(),
            username: registration.username,
            email: registration.email,
            created_at: Utc::now(),
        };
        let salt = generate_salt();
        let hash = hash_password(&registration.password, &salt);

        sqlx::query(
            r#"
            INSERT INTO users (guid, username, email, password_hash, password_salt, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&hash)
        .bind(&salt)
        .bind(format_timestamp(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::AlreadyExists("User with this email already exists".to_string())
            }
            other => Error::Database(other),
        })?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let row = sqlx::query(
            r#"
            SELECT guid, username, email, password_hash, password_salt, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("No user found with this email".to_string()))?;

        let stored_hash: String = row.get("password_hash");
        let salt: String = row.get("password_salt");
        if !verify_password(password, &salt, &stored_hash) {
            return Err(Error::Unauthorized("Invalid password".to_string()));
        }

        let user = Self::user_from_row(&row)?;
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).ok_or_else(|| {
            Error::Config(format!(
                "Session lifetime of {} hours is out of range",
                self.session_ttl.num_hours()
            ))
        })?;
        let session = Session {
            token: Uuid::new_v4(),
            user,
            created_at: now,
            expires_at,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_guid, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.token.to_string())
        .bind(session.user.id.to_string())
        .bind(format_timestamp(session.created_at))
        .bind(format_timestamp(session.expires_at))
        .execute(&self.pool)
        .await?;

        info!(user_id = %session.user.id, "User logged in");
        Ok(session)
    }

    async fn logout(&self, token: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("User logged out");
        }
        Ok(())
    }

    async fn current_session(&self, token: Uuid) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT s.token, s.created_at AS session_created_at, s.expires_at,
                   u.guid, u.username, u.email, u.created_at
            FROM sessions s
            JOIN users u ON u.guid = s.user_guid
            WHERE s.token = ?
            "#,
        )
        .bind(token.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let session_created_at: String = row.get("session_created_at");
        let expires_at: String = row.get("expires_at");
        let session = Session {
            token,
            user: Self::user_from_row(&row)?,
            created_at: parse_timestamp("sessions.created_at", &session_created_at)?,
            expires_at: parse_timestamp("sessions.expires_at", &expires_at)?,
        };

        if session.is_expired_at(Utc::now()) {
            debug!(user_id = %session.user.id, "Session expired");
            self.logout(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }
}
