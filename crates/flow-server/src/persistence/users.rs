//! User, role assignment, and API token persistence.

use anyhow::Result;
use flow_core::enums::RoleKey;
use flow_core::models::User;
use sqlx::SqlitePool;

/// Reserved id for the built-in system user.
pub const SYSTEM_USER_ID: &str = "system";

pub(crate) fn role_to_str(role: RoleKey) -> &'static str {
    match role {
        RoleKey::System => "system",
        RoleKey::Nmt => "nmt",
        RoleKey::FlowManager => "flow_manager",
        RoleKey::User => "user",
    }
}

pub(crate) fn str_to_role(raw: &str) -> Result<RoleKey> {
    match raw {
        "system" => Ok(RoleKey::System),
        "nmt" => Ok(RoleKey::Nmt),
        "flow_manager" => Ok(RoleKey::FlowManager),
        "user" => Ok(RoleKey::User),
        other => anyhow::bail!("Unknown role: {}", other),
    }
}

/// Insert a user with their region assignments and API token in one
/// transaction.
pub async fn insert_user(pool: &SqlitePool, user: &User, token: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO users (id, name, role) VALUES (?1, ?2, ?3)")
        .bind(&user.id)
        .bind(&user.name)
        .bind(role_to_str(user.role))
        .execute(&mut *tx)
        .await?;

    for fir_id in &user.flight_information_region_ids {
        sqlx::query(
            "INSERT INTO user_flight_information_regions (user_id, flight_information_region_id) VALUES (?1, ?2)",
        )
        .bind(&user.id)
        .bind(fir_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("INSERT INTO user_tokens (token, user_id) VALUES (?1, ?2)")
        .bind(token)
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn load_user(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row: Option<(String, String, String)> =
        sqlx::query_as("SELECT id, name, role FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    let Some((id, name, role)) = row else {
        return Ok(None);
    };

    let fir_ids: Vec<(String,)> = sqlx::query_as(
        "SELECT flight_information_region_id FROM user_flight_information_regions WHERE user_id = ?1",
    )
    .bind(&id)
    .fetch_all(pool)
    .await?;

    Ok(Some(User {
        id,
        name,
        role: str_to_role(&role)?,
        flight_information_region_ids: fir_ids.into_iter().map(|(fir_id,)| fir_id).collect(),
    }))
}

/// Load all persisted API tokens as (token, user id) pairs.
pub async fn load_all_tokens(pool: &SqlitePool) -> Result<Vec<(String, String)>> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT token, user_id FROM user_tokens")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Seed the built-in system user so measures created via the system token
/// satisfy the user foreign key.
pub async fn ensure_system_user(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO users (id, name, role) VALUES (?1, 'System', 'system')")
        .bind(SYSTEM_USER_ID)
        .execute(pool)
        .await?;

    Ok(())
}
