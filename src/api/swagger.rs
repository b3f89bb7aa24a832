use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "1.0.0",
        description = "Personal expense tracking API. \n\n**Authentication:** expense and `/me` endpoints require a JWT Bearer token obtained from register or login.\n\n**Features:**\n- Email/password registration and login\n- Owner-scoped expense CRUD\n- Day, month and year filters on the expense list"
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Expenses
        crate::api::expenses::list_expenses,
        crate::api::expenses::create_expense,
        crate::api::expenses::update_expense,
        crate::api::expenses::delete_expense,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::models::Credentials,
            crate::models::AuthResponse,
            crate::models::UserInfo,

            // Expenses
            crate::models::Expense,
            crate::models::CreateExpenseRequest,
            crate::models::UpdateExpenseRequest,
            crate::models::MessageResponse,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and current-user endpoints."),
        (name = "Expenses", description = "Create, list, filter, update and delete the caller's own expenses."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /api/auth/login or /api/auth/register"))
                        .build()
                ),
            );
        }
    }
}
