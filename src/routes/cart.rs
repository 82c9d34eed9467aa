use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{
        AddToCartRequest, ApiResponse, CartData, CartItem, UpdateCartItemRequest, User,
    },
    queries::{cart_queries, product_queries},
    validation,
    AppState,
};

/// Lazily creates the user's cart on first read. Repeated calls are
/// side-effect free beyond that one creation.
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<CartData>>> {
    let cart = cart_queries::find_or_create_cart(&state.db, user.id).await?;

    let items = cart_queries::get_cart_lines(&state.db, cart.id).await?;
    let total = cart_queries::cart_total(&state.db, cart.id).await?;

    Ok(Json(ApiResponse::data(CartData { items, total })))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<Json<ApiResponse<CartItem>>> {
    let errors = validation::validate_quantity(payload.quantity);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if product_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let cart = cart_queries::find_or_create_cart(&state.db, user.id).await?;
    let item =
        cart_queries::upsert_item(&state.db, cart.id, payload.product_id, payload.quantity).await?;

    Ok(Json(ApiResponse::ok(
        "Product added to cart successfully.",
        item,
    )))
}

/// Replaces the quantity outright. Takes a bare item id; the row is not
/// checked against the calling user.
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> Result<Json<ApiResponse<CartItem>>> {
    let errors = validation::validate_quantity(payload.quantity);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let item = cart_queries::set_quantity(&state.db, id, payload.quantity)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart item not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Cart item updated successfully.", item)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    if !cart_queries::remove_item(&state.db, id).await? {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    Ok(Json(ApiResponse::message(
        "Item removed from cart successfully.",
    )))
}
