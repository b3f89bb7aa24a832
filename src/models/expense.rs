use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense record (stored in the `expenses` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,

    /// Owning user's id
    #[serde(rename = "user")]
    pub user_id: String,

    pub description: String,

    pub amount: f64,

    pub date: DateTime<Utc>,
}

/// Validated input for a new expense. The owner is set by the caller of the
/// store, never taken from the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub user_id: String,
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

/// Half-open `[start, end)` interval used by the list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Amounts arrive either as JSON numbers or as numeric strings from form inputs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateExpenseRequest {
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub amount: Option<AmountInput>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub amount: Option<AmountInput>,
    pub date: Option<String>,
}

/// `GET /api/expenses` filter. Kept as text so bad values get our own message.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
