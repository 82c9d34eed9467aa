use sqlx::PgPool;

use crate::{error::Result, models::User, utils::token};

/// Mints a fresh opaque token for the user, stores its digest and returns the
/// plaintext. The plaintext is never persisted; this is the only moment it
/// exists server-side.
pub async fn issue(pool: &PgPool, user_id: i32) -> Result<String> {
    let plaintext = token::mint();

    sqlx::query("INSERT INTO access_tokens (user_id, token_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(token::hash(&plaintext))
        .execute(pool)
        .await?;

    Ok(plaintext)
}

pub async fn find_user_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.* FROM users u
         JOIN access_tokens t ON t.user_id = u.id
         WHERE t.token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Logout revokes every live session for the user, not just the presenting
/// one. Deliberate: clients observe and rely on this.
pub async fn revoke_all(pool: &PgPool, user_id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
