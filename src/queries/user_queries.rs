use sqlx::PgPool;

use crate::{
    error::Result,
    models::{RegisterRequest, UpdateProfileRequest, User},
};

pub async fn create_user(pool: &PgPool, req: &RegisterRequest, password_hash: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, lastname, email, password, country, phone, city, address, postalcode)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.lastname)
    .bind(&req.email)
    .bind(password_hash)
    .bind(&req.country)
    .bind(&req.phone)
    .bind(&req.city)
    .bind(&req.address)
    .bind(&req.postalcode)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Case-insensitive uniqueness probe. `exclude_id` lets a profile edit re-save
/// the caller's own unchanged email.
pub async fn email_taken(pool: &PgPool, email: &str, exclude_id: Option<i32>) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM users
            WHERE LOWER(email) = LOWER($1)
            AND ($2::int IS NULL OR id <> $2)
        )",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

pub async fn update_profile(pool: &PgPool, id: i32, req: &UpdateProfileRequest) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET
             name = COALESCE($1, name),
             lastname = COALESCE($2, lastname),
             email = COALESCE($3, email),
             updated_at = NOW()
         WHERE id = $4
         RETURNING *",
    )
    .bind(&req.name)
    .bind(&req.lastname)
    .bind(&req.email)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Tokens and the cart go with the user via ON DELETE CASCADE.
pub async fn delete_user(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
