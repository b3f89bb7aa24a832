use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::AppError;

pub use crate::services::auth_service::Claims;

/// Header the React client sends the token in.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Rejects requests without a valid token and stores the decoded [`Claims`]
/// in the request extensions for `web::ReqData<Claims>` extractors.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// `Authorization: Bearer <token>` wins; `x-auth-token` is the fallback.
fn extract_token(req: &ServiceRequest) -> Result<String, AppError> {
    let invalid_format = || AppError::Unauthorized("Invalid token format".to_string());

    if let Some(header_value) = req.headers().get(AUTHORIZATION) {
        let header_str = header_value.to_str().map_err(|_| invalid_format())?;
        let (scheme, token) = header_str.trim().split_once(' ').ok_or_else(invalid_format)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(invalid_format());
        }
        return Ok(token.to_string());
    }

    match req.headers().get(LEGACY_TOKEN_HEADER) {
        Some(header_value) => {
            let token = header_value.to_str().map_err(|_| invalid_format())?.trim();
            if token.is_empty() {
                return Err(invalid_format());
            }
            Ok(token.to_string())
        }
        None => Err(AppError::Unauthorized("Missing authorization token".to_string())),
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let token = extract_token(req)?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;
    auth_service::verify_token(&token, &state.auth)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match authenticate(&req) {
            Ok(claims) => claims,
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                return Box::pin(async move { Err(Error::from(e)) });
            }
        };

        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::User;
    use crate::services::auth_service::tests::test_config;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use std::sync::Arc;

    async fn whoami(user: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(user.sub.clone())
    }

    fn state() -> web::Data<AppState> {
        let store = Arc::new(MemoryStore::new());
        web::Data::new(AppState::new(store.clone(), store, test_config()))
    }

    fn token_for(user_id: &str) -> String {
        let user = User {
            user_id: user_id.to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
        };
        auth_service::generate_jwt(&user, &test_config()).unwrap()
    }

    macro_rules! gated_app {
        () => {
            test::init_service(
                App::new().app_data(state()).service(
                    web::scope("/private")
                        .wrap(AuthMiddleware)
                        .route("", web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn passes_claims_from_bearer_token() {
        let app = gated_app!();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token_for("user-1"))))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "user-1");
    }

    #[actix_web::test]
    async fn accepts_legacy_header() {
        let app = gated_app!();
        let req = test::TestRequest::get()
            .uri("/private")
            .insert_header((LEGACY_TOKEN_HEADER, token_for("user-2")))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "user-2");
    }

    #[actix_web::test]
    async fn rejects_missing_malformed_and_forged_tokens() {
        let app = gated_app!();
        let forged = format!("{}x", token_for("user-1"));
        let cases: Vec<(&str, String)> = vec![
            ("authorization", "Basic dXNlcjpwYXNz".to_string()),
            ("authorization", "Bearer ".to_string()),
            ("authorization", format!("Bearer {}", forged)),
            (LEGACY_TOKEN_HEADER, "garbage".to_string()),
        ];

        for (header, value) in cases {
            let req = test::TestRequest::get()
                .uri("/private")
                .insert_header((header, value.clone()))
                .to_request();
            let resp = test::try_call_service(&app, req).await;
            let status = match resp {
                Ok(resp) => resp.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}: {}", header, value);
        }

        let req = test::TestRequest::get().uri("/private").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }
}
