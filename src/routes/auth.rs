use axum::{extract::State, Extension, Json};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, AuthData, LoginRequest, RegisterRequest, User},
    queries::{token_queries, user_queries},
    validation::{self, add_error},
    AppState,
};

/// Registration issues a token immediately: a freshly registered user is
/// logged in without a separate login call.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthData>>> {
    let mut errors = validation::validate_registration(&payload);

    if !errors.contains_key("email")
        && user_queries::email_taken(&state.db, &payload.email, None).await?
    {
        add_error(&mut errors, "email", "The email has already been taken.");
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::create_user(&state.db, &payload, &password_hash).await?;
    let token = token_queries::issue(&state.db, user.id).await?;

    tracing::info!("Registered user {}", user.id);

    Ok(Json(ApiResponse::ok(
        "User Created Successfully",
        AuthData { token },
    )))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>> {
    let errors = validation::validate_login(&payload);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Email & Password do not match our records.".to_string())
        })?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Email & Password do not match our records.".to_string(),
        ));
    }

    let token = token_queries::issue(&state.db, user.id).await?;

    Ok(Json(ApiResponse::ok(
        "User Logged In Successfully",
        AuthData { token },
    )))
}

/// Revokes every token the user holds, across all devices.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<()>>> {
    token_queries::revoke_all(&state.db, user.id).await?;

    Ok(Json(ApiResponse::message("User Logged Out Successfully")))
}
