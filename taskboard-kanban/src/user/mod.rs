//! User commands: registration, login and lookup

mod authenticate;
mod get;
mod provision;
mod register;

pub use authenticate::AuthenticateUser;
pub use get::GetCurrentUser;
pub use provision::{provision_workspace, Provisioning, STARTER_BOARD_NAME, STARTER_TASKS};
pub use register::RegisterUser;

use crate::error::Result;
use crate::types::{User, UserId};
use rusqlite::{Connection, OptionalExtension, Row};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Emails compare case-insensitively and ignore surrounding whitespace
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Look up a user and their password hash by normalized email
pub(crate) fn find_by_email(conn: &Connection, email: &str) -> Result<Option<(User, String)>> {
    let found = conn
        .query_row(
            "SELECT id, email, name, created_at, password_hash FROM users WHERE email = ?1",
            [email],
            |row| Ok((user_from_row(row)?, row.get(4)?)),
        )
        .optional()?;
    Ok(found)
}

pub(crate) fn find_by_id(conn: &Connection, id: &UserId) -> Result<Option<User>> {
    let found = conn
        .query_row(
            "SELECT id, email, name, created_at FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(found)
}
