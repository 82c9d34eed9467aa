use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, ImageUpload, Product, ProductInput, ProductQuery},
    queries::product_queries,
    validation,
    AppState,
};

const IMAGE_DIR: &str = "products";

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = product_queries::search_products(&state.db, &params).await?;

    Ok(Json(ApiResponse::ok(
        "Products fetched successfully.",
        products,
    )))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::data(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let input = read_product_form(multipart).await?;
    let fields = validation::validate_product(&input, true).map_err(AppError::Validation)?;

    let (Some(name), Some(price)) = (&fields.name, fields.price) else {
        return Err(AppError::InternalError(
            "Validated product fields missing".to_string(),
        ));
    };

    let stored_image = match input.image {
        Some(ref upload) => Some(
            state
                .images
                .save(IMAGE_DIR, &upload.content_type, &upload.data)
                .await?,
        ),
        None => None,
    };

    // The file is already on disk; if the row insert fails, remove it rather
    // than leaking an orphaned blob.
    let product = match product_queries::create_product(
        &state.db,
        name,
        price,
        fields.description.as_deref(),
        fields.category.as_deref(),
        stored_image.as_deref(),
    )
    .await
    {
        Ok(product) => product,
        Err(e) => {
            if let Some(ref path) = stored_image {
                if let Err(cleanup) = state.images.delete(path).await {
                    tracing::warn!("Failed to clean up orphaned image {}: {}", path, cleanup);
                }
            }
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Product created successfully.", product)),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Product>>> {
    let existing = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let input = read_product_form(multipart).await?;
    let fields = validation::validate_product(&input, false).map_err(AppError::Validation)?;

    let new_image = match input.image {
        Some(ref upload) => Some(
            state
                .images
                .save(IMAGE_DIR, &upload.content_type, &upload.data)
                .await?,
        ),
        None => None,
    };

    let product = match product_queries::update_product(&state.db, id, &fields, new_image.as_deref())
        .await
    {
        Ok(Some(product)) => product,
        Ok(None) => {
            cleanup_image(&state, new_image.as_deref()).await;
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Err(e) => {
            cleanup_image(&state, new_image.as_deref()).await;
            return Err(e);
        }
    };

    // A replaced image must not linger in storage.
    if new_image.is_some() {
        if let Some(ref old_image) = existing.image {
            state.images.delete(old_image).await?;
        }
    }

    Ok(Json(ApiResponse::ok(
        "Product updated successfully.",
        product,
    )))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>> {
    let product = product_queries::delete_product(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if let Some(ref image) = product.image {
        state.images.delete(image).await?;
    }

    Ok(Json(ApiResponse::message("Product deleted successfully.")))
}

async fn cleanup_image(state: &AppState, path: Option<&str>) {
    if let Some(path) = path {
        if let Err(e) = state.images.delete(path).await {
            tracing::warn!("Failed to clean up orphaned image {}: {}", path, e);
        }
    }
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductInput> {
    let mut input = ProductInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "name" => input.name = Some(read_text(field).await?),
            "price" => input.price = Some(read_text(field).await?),
            "description" => input.description = Some(read_text(field).await?),
            "category" => input.category = Some(read_text(field).await?),
            "image" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed image upload: {}", e)))?
                    .to_vec();

                // Browsers send an empty part for an untouched file input.
                if !data.is_empty() {
                    input.image = Some(ImageUpload { content_type, data });
                }
            }
            _ => {}
        }
    }

    Ok(input)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart field: {}", e)))
}
