use super::Queries;
use crate::error::{RowRef, StoreError, StoreResult};
use crate::model::Session;
use rusqlite::{params, Row};
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, user_id, username, refresh_token, user_agent, client_ip, is_blocked, expires_at, created_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionParams {
    pub id: Uuid,
    pub user_id: i64,
    pub username: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: i64,
}

impl Queries<'_> {
    pub fn create_session(&self, arg: &CreateSessionParams) -> StoreResult<Session> {
        self.insert_returning(
            &format!(
                "INSERT INTO sessions (
                    id, user_id, username, refresh_token, user_agent, client_ip, is_blocked, expires_at
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {SESSION_COLUMNS};"
            ),
            params![
                arg.id.to_string(),
                arg.user_id,
                arg.username,
                arg.refresh_token,
                arg.user_agent,
                arg.client_ip,
                arg.is_blocked,
                arg.expires_at
            ],
            "sessions",
            parse_session_row,
        )
    }

    pub fn get_session(&self, id: Uuid) -> StoreResult<Session> {
        self.fetch_one(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1;"),
            [id.to_string()],
            RowRef::Session(id),
            parse_session_row,
        )
    }

    pub fn list_sessions_by_user(&self, user_id: i64) -> StoreResult<Vec<Session>> {
        self.fetch_all(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1 ORDER BY created_at ASC, id ASC;"
            ),
            [user_id],
            parse_session_row,
        )
    }

    pub fn list_sessions_by_username(&self, username: &str) -> StoreResult<Vec<Session>> {
        self.fetch_all(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE username = ?1 ORDER BY created_at ASC, id ASC;"
            ),
            [username],
            parse_session_row,
        )
    }

    pub fn block_session(&self, id: Uuid) -> StoreResult<Session> {
        self.update_returning(
            &format!("UPDATE sessions SET is_blocked = 1 WHERE id = ?1 RETURNING {SESSION_COLUMNS};"),
            [id.to_string()],
            "sessions",
            RowRef::Session(id),
            parse_session_row,
        )
    }

    /// Rewrites the denormalized username of every session owned by `user_id`.
    pub fn update_session_username_for_user(&self, user_id: i64, username: &str) -> StoreResult<usize> {
        self.execute(
            "UPDATE sessions SET username = ?2 WHERE user_id = ?1;",
            params![user_id, username],
            "sessions",
        )
    }

    pub fn delete_sessions_for_user(&self, user_id: i64) -> StoreResult<usize> {
        self.execute("DELETE FROM sessions WHERE user_id = ?1;", [user_id], "sessions")
    }
}

fn parse_session_row(row: &Row<'_>) -> StoreResult<Session> {
    let raw_id: String = row.get("id")?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|err| StoreError::InvalidData(format!("invalid session id `{raw_id}`: {err}")))?;
    Ok(Session {
        id,
        user_id: row.get("user_id")?,
        username: row.get("username")?,
        refresh_token: row.get("refresh_token")?,
        user_agent: row.get("user_agent")?,
        client_ip: row.get("client_ip")?,
        is_blocked: row.get("is_blocked")?,
        expires_at: row.get("expires_at")?,
        created_at: row.get("created_at")?,
    })
}
