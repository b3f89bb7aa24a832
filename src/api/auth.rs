use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::auth::Claims;
use crate::models::{AuthResponse, Credentials, UserInfo};
use crate::services::auth_service;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Missing fields or user already exists")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<Credentials>,
) -> HttpResponse {
    let email_str = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /auth/register - email: {}", email_str);

    match auth_service::register(state.users.as_ref(), &state.auth, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", response.user.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            e.log("Registration failed");
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<Credentials>,
) -> HttpResponse {
    let email_str = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /auth/login - email: {}", email_str);

    match auth_service::login(state.users.as_ref(), &state.auth, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", response.user.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            e.log("Login failed");
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: web::ReqData<Claims>, state: web::Data<AppState>) -> HttpResponse {
    log::info!("👤 GET /auth/me - user {}", user.sub);

    match auth_service::get_current_user(state.users.as_ref(), &user.sub).await {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => {
            e.log("Failed to get user");
            e.error_response()
        }
    }
}
