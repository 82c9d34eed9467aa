use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Cart, CartItem, CartLine},
};

/// Find-or-create keyed on user_id in a single statement, so concurrent first
/// touches of the cart cannot create two rows. The no-op DO UPDATE keeps
/// RETURNING populated on the conflict path.
pub async fn find_or_create_cart(pool: &PgPool, user_id: i32) -> Result<Cart> {
    let cart = sqlx::query_as::<_, Cart>(
        "INSERT INTO carts (user_id) VALUES ($1)
         ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
         RETURNING *",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(cart)
}

/// Atomic insert-or-increment on the (cart_id, product_id) pair. Adding a
/// product already in the cart bumps its quantity; concurrent adds cannot
/// produce a duplicate line or lose an increment.
pub async fn upsert_item(
    pool: &PgPool,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<CartItem> {
    let item = sqlx::query_as::<_, CartItem>(
        "INSERT INTO cart_items (cart_id, product_id, quantity)
         VALUES ($1, $2, $3)
         ON CONFLICT (cart_id, product_id)
         DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW()
         RETURNING *",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Lines joined with the live product row. Items whose product has since been
/// deleted drop out of the join rather than surfacing stale data.
pub async fn get_cart_lines(pool: &PgPool, cart_id: i32) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT ci.id, ci.quantity, p.id AS product_id, p.name, p.price, p.image
         FROM cart_items ci
         JOIN products p ON p.id = ci.product_id
         WHERE ci.cart_id = $1
         ORDER BY ci.id",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;

    Ok(lines)
}

/// On-demand total over live prices; nothing is snapshotted at add-time.
pub async fn cart_total(pool: &PgPool, cart_id: i32) -> Result<Decimal> {
    let total = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(ci.quantity * p.price), 0)
         FROM cart_items ci
         JOIN products p ON p.id = ci.product_id
         WHERE ci.cart_id = $1",
    )
    .bind(cart_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

pub async fn set_quantity(pool: &PgPool, item_id: i32, quantity: i32) -> Result<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "UPDATE cart_items SET quantity = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(quantity)
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn remove_item(pool: &PgPool, item_id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
