use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::str::FromStr;

use crate::database::ExpenseStore;
use crate::models::{
    AmountInput, CreateExpenseRequest, DateRange, Expense, ExpenseChanges, ExpenseQuery,
    NewExpense, UpdateExpenseRequest,
};
use crate::utils::{AppError, AppResult};

const REQUIRED_FIELDS: &str = "Description and amount are required.";

/// Years outside this range are rejected before any date arithmetic.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parses one `year`/`month`/`day` query component. Empty counts as absent.
fn component<T: FromStr>(raw: Option<&str>, name: &str) -> AppResult<Option<T>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Invalid {} filter: '{}'", name, value))),
    }
}

/// Turns the list query into a half-open UTC range:
/// year+month+day → that day, year+month → that month, year → that year.
/// A month or day without a year applies no filter; a day without a month
/// is ignored.
pub fn date_range(query: &ExpenseQuery) -> AppResult<Option<DateRange>> {
    let year = component::<i32>(query.year.as_deref(), "year")?;
    let month = component::<u32>(query.month.as_deref(), "month")?;
    let day = component::<u32>(query.day.as_deref(), "day")?;

    let Some(year) = year else {
        return Ok(None);
    };
    if !YEAR_RANGE.contains(&year) {
        return Err(AppError::Validation(format!("Invalid year filter: '{}'", year)));
    }

    let bounds = match (month, day) {
        (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|start| start.succ_opt().map(|end| (start, end))),
        (Some(month), None) => {
            let next = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            NaiveDate::from_ymd_opt(year, month, 1)
                .zip(NaiveDate::from_ymd_opt(next.0, next.1, 1))
        }
        (None, _) => NaiveDate::from_ymd_opt(year, 1, 1).zip(NaiveDate::from_ymd_opt(year + 1, 1, 1)),
    };

    let (start, end) = bounds.ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid date filter: year={} month={} day={}",
            year,
            month.map(|m| m.to_string()).unwrap_or_default(),
            day.map(|d| d.to_string()).unwrap_or_default(),
        ))
    })?;

    Ok(Some(DateRange {
        start: midnight(start),
        end: midnight(end),
    }))
}

/// Amount as submitted, `None` when blank. Numeric strings are coerced.
fn parse_amount(input: &AmountInput) -> AppResult<Option<f64>> {
    let value = match input {
        AmountInput::Number(n) => *n,
        AmountInput::Text(text) if text.trim().is_empty() => return Ok(None),
        AmountInput::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation(format!("Amount must be a number, got '{}'", text)))?,
    };

    if !value.is_finite() {
        return Err(AppError::Validation("Amount must be a finite number".to_string()));
    }
    Ok(Some(value))
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) or `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(date.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(midnight(date));
    }

    Err(AppError::Validation(format!("Invalid date: '{}'", raw)))
}

fn optional_date(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => parse_date(raw).map(Some),
        None => Ok(None),
    }
}

/// Validates a create request. A blank amount or a numeric zero counts as
/// missing; the text `"0"` does not. The description is stored as submitted.
pub fn new_expense(
    user_id: &str,
    request: &CreateExpenseRequest,
    now: DateTime<Utc>,
) -> AppResult<NewExpense> {
    let description = request
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty());

    let amount = match &request.amount {
        Some(AmountInput::Number(n)) if *n == 0.0 => None,
        Some(input) => parse_amount(input)?,
        None => None,
    };

    let (Some(description), Some(amount)) = (description, amount) else {
        return Err(AppError::Validation(REQUIRED_FIELDS.to_string()));
    };

    Ok(NewExpense {
        user_id: user_id.to_string(),
        description: description.to_string(),
        amount,
        date: optional_date(request.date.as_deref())?.unwrap_or(now),
    })
}

/// Validates an update request. Only the fields present are changed.
pub fn expense_changes(request: &UpdateExpenseRequest) -> AppResult<ExpenseChanges> {
    let description = match request.description.as_deref() {
        Some(d) if d.trim().is_empty() => {
            return Err(AppError::Validation("Description cannot be empty.".to_string()))
        }
        other => other.map(String::from),
    };

    let amount = match &request.amount {
        Some(input) => Some(
            parse_amount(input)?
                .ok_or_else(|| AppError::Validation("Amount cannot be empty.".to_string()))?,
        ),
        None => None,
    };

    Ok(ExpenseChanges {
        description,
        amount,
        date: optional_date(request.date.as_deref())?,
    })
}

pub async fn list_expenses(
    store: &dyn ExpenseStore,
    user_id: &str,
    query: &ExpenseQuery,
) -> AppResult<Vec<Expense>> {
    let range = date_range(query)?;
    store.list_expenses(user_id, range).await
}

pub async fn create_expense(
    store: &dyn ExpenseStore,
    user_id: &str,
    request: &CreateExpenseRequest,
) -> AppResult<Expense> {
    let expense = new_expense(user_id, request, Utc::now())?;
    store.insert_expense(expense).await
}

pub async fn update_expense(
    store: &dyn ExpenseStore,
    user_id: &str,
    expense_id: &str,
    request: &UpdateExpenseRequest,
) -> AppResult<Expense> {
    let changes = expense_changes(request)?;
    store
        .update_expense(user_id, expense_id, &changes)
        .await?
        .ok_or_else(AppError::expense_not_found)
}

pub async fn delete_expense(
    store: &dyn ExpenseStore,
    user_id: &str,
    expense_id: &str,
) -> AppResult<Expense> {
    store
        .delete_expense(user_id, expense_id)
        .await?
        .ok_or_else(AppError::expense_not_found)
}
