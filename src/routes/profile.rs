use axum::{extract::State, Extension, Json};

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, ProfileSummary, UpdateProfileRequest, User, UserProfile},
    queries::user_queries,
    validation::{self, add_error},
    AppState,
};

pub async fn get_profile(
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    Ok(Json(ApiResponse::ok(
        "User Profile Fetched Successfully",
        UserProfile::from(user),
    )))
}

/// Partial edit: only name, lastname and email are editable here, each
/// applied independently when present.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileSummary>>> {
    let mut errors = validation::validate_profile_update(&payload);

    if let Some(ref email) = payload.email {
        if !errors.contains_key("email")
            && user_queries::email_taken(&state.db, email, Some(user.id)).await?
        {
            add_error(&mut errors, "email", "The email has already been taken.");
        }
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let updated = user_queries::update_profile(&state.db, user.id, &payload).await?;

    Ok(Json(ApiResponse::ok(
        "User Profile Updated Successfully",
        ProfileSummary::from(updated),
    )))
}

pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<()>>> {
    user_queries::delete_user(&state.db, user.id).await?;

    tracing::info!("Deleted user {}", user.id);

    Ok(Json(ApiResponse::message("User Profile Deleted Successfully")))
}
