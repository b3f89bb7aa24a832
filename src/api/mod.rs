pub mod auth;
pub mod expenses;
pub mod health;
pub mod swagger;

use actix_web::{error, web, HttpRequest};

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid query string: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid path: {}", err)).into()
}

/// Route table shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health_check))
        // Auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_me)),
                ),
        )
        // Expenses: owner-scoped CRUD - Requires JWT
        .service(
            web::scope("/api/expenses")
                .wrap(AuthMiddleware)
                .route("", web::get().to(expenses::list_expenses))
                .route("", web::post().to(expenses::create_expense))
                .route("/{id}", web::patch().to(expenses::update_expense))
                .route("/{id}", web::put().to(expenses::update_expense))
                .route("/{id}", web::delete().to(expenses::delete_expense)),
        );
}
