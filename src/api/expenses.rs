use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::auth::Claims;
use crate::models::{CreateExpenseRequest, Expense, ExpenseQuery, MessageResponse, UpdateExpenseRequest};
use crate::services::expense_service;
use crate::state::AppState;

/// GET /api/expenses - Lists the caller's expenses, newest first
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Caller's expenses, newest first", body = [Expense]),
        (status = 400, description = "Invalid year/month/day filter"),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_expenses(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<ExpenseQuery>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!(
        "📋 GET /expenses - user {} (year={:?} month={:?} day={:?})",
        user_id, query.year, query.month, query.day
    );

    match expense_service::list_expenses(state.expenses.as_ref(), user_id, &query).await {
        Ok(expenses) => {
            log::info!("✅ Listed {} expenses", expenses.len());
            HttpResponse::Ok().json(expenses)
        }
        Err(e) => {
            e.log("Error listing expenses");
            e.error_response()
        }
    }
}

/// POST /api/expenses - Creates an expense owned by the caller
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = Expense),
        (status = 400, description = "Description and amount are required"),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_expense(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    request: web::Json<CreateExpenseRequest>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!("📝 POST /expenses - user {}", user_id);

    match expense_service::create_expense(state.expenses.as_ref(), user_id, &request).await {
        Ok(expense) => {
            log::info!("✅ Expense created: {}", expense.id);
            HttpResponse::Created().json(expense)
        }
        Err(e) => {
            e.log("Error creating expense");
            e.error_response()
        }
    }
}

/// PATCH|PUT /api/expenses/{id} - Updates an expense owned by the caller
#[utoipa::path(
    method(patch, put),
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(
        ("id" = String, Path, description = "Expense id")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Updated expense", body = Expense),
        (status = 400, description = "Invalid field value"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Expense not found or unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_expense(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    expense_id: web::Path<String>,
    request: web::Json<UpdateExpenseRequest>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!("🔧 PATCH/PUT /expenses/{} - user {}", expense_id, user_id);

    match expense_service::update_expense(state.expenses.as_ref(), user_id, &expense_id, &request).await {
        Ok(expense) => {
            log::info!("✅ Expense updated: {}", expense.id);
            HttpResponse::Ok().json(expense)
        }
        Err(e) => {
            e.log("Error updating expense");
            e.error_response()
        }
    }
}

/// DELETE /api/expenses/{id} - Removes an expense owned by the caller
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(
        ("id" = String, Path, description = "Expense id")
    ),
    responses(
        (status = 200, description = "Expense deleted", body = MessageResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Expense not found or unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_expense(
    user: web::ReqData<Claims>,
    state: web::Data<AppState>,
    expense_id: web::Path<String>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!("🗑️  DELETE /expenses/{} - user {}", expense_id, user_id);

    match expense_service::delete_expense(state.expenses.as_ref(), user_id, &expense_id).await {
        Ok(expense) => {
            log::info!("✅ Expense deleted: {}", expense.id);
            HttpResponse::Ok().json(MessageResponse {
                message: "Expense deleted successfully.".to_string(),
            })
        }
        Err(e) => {
            e.log("Error deleting expense");
            e.error_response()
        }
    }
}
