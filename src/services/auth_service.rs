use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::database::UserStore;
use crate::models::{normalize_email, AuthResponse, Credentials, User, UserInfo};
use crate::utils::{AppError, AppResult};

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

fn encode_claims(claims: &Claims, config: &AuthConfig) -> AppResult<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Generate JWT token
pub fn generate_jwt(user: &User, config: &AuthConfig) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + config.token_ttl).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
    };

    encode_claims(&claims, config)
}

// Verify JWT token (signature, expiry, issuer, audience)
pub fn verify_token(token: &str, config: &AuthConfig) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}

/// Pulls a trimmed, non-empty email and password out of the request body.
fn required_credentials(request: &Credentials) -> AppResult<(String, &str)> {
    let email = request
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty());
    let password = request.password.as_deref().filter(|p| !p.is_empty());

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation("Email and password are required.".to_string())),
    }
}

fn auth_response(user: &User, config: &AuthConfig) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        token: generate_jwt(user, config)?,
        user: UserInfo::from(user),
    })
}

// User registration
pub async fn register(
    users: &dyn UserStore,
    config: &AuthConfig,
    request: &Credentials,
) -> AppResult<AuthResponse> {
    let (email, password) = required_credentials(request)?;

    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address.".to_string()));
    }

    if users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let user = User {
        user_id: ObjectId::new().to_hex(),
        email,
        password_hash: hash(password, config.bcrypt_cost)?,
    };

    users.insert_user(&user).await?;

    log::info!("✅ User registered successfully: {}", user.email);

    auth_response(&user, config)
}

// User login
pub async fn login(
    users: &dyn UserStore,
    config: &AuthConfig,
    request: &Credentials,
) -> AppResult<AuthResponse> {
    let (email, password) = required_credentials(request)?;
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = users.find_user_by_email(&email).await?.ok_or_else(invalid)?;

    if !verify(password, &user.password_hash)? {
        return Err(invalid());
    }

    auth_response(&user, config)
}

// Get current user
pub async fn get_current_user(users: &dyn UserStore, user_id: &str) -> AppResult<UserInfo> {
    users
        .find_user_by_id(user_id)
        .await?
        .map(|user| UserInfo::from(&user))
        // Token outlived its account
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
}
