use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub country: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub postalcode: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub country: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub postalcode: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

/// Full profile payload for `GET /user`. The password hash never leaves the
/// `User` row type.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub city: String,
    pub postalcode: String,
    pub address: String,
    pub is_admin: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            lastname: user.lastname,
            email: user.email,
            phone: user.phone,
            country: user.country,
            city: user.city,
            postalcode: user.postalcode,
            address: user.address,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub lastname: String,
    pub email: String,
}

impl From<User> for ProfileSummary {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            lastname: user.lastname,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthData {
    pub token: String,
}
