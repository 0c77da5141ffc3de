//! User Repository

use shared::models::User;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, email, password_hash, is_admin, event_name, event_date, created_at";

/// Insert payload; strings are already validated and normalized
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
    pub event_name: Option<&'a str>,
    pub event_date: Option<&'a str>,
}

impl<'a> NewUser<'a> {
    /// Plain organizer without event details
    pub fn organizer(name: &'a str, email: &'a str, password_hash: &'a str) -> Self {
        Self {
            name,
            email,
            password_hash,
            is_admin: false,
            event_name: None,
            event_date: None,
        }
    }
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM app_user WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM app_user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &SqlitePool, new: &NewUser<'_>, now: i64) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO app_user (name, email, password_hash, is_admin, event_name, event_date, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(new.name)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.is_admin)
    .bind(new.event_name)
    .bind(new.event_date)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial profile update. `None` keeps the stored value; an empty event
/// field clears it.
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    email: Option<&str>,
    event_name: Option<&str>,
    event_date: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE app_user SET
             name = COALESCE(?, name),
             email = COALESCE(?, email),
             event_name = NULLIF(COALESCE(?, event_name), ''),
             event_date = NULLIF(COALESCE(?, event_date), '')
         WHERE id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(email)
    .bind(event_name)
    .bind(event_date)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_password_hash(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("UPDATE app_user SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
