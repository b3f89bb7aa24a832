//! In-process stand-in for MongoDB used by handler and service tests.
//! Applies the same owner filter and newest-first ordering as the real store.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::RwLock;

use super::{ExpenseStore, UserStore};
use crate::models::{DateRange, Expense, ExpenseChanges, NewExpense, User};
use crate::utils::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    expenses: RwLock<Vec<Expense>>,
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("memory store lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored expense regardless of owner, for assertions.
    pub fn all_expenses(&self) -> Vec<Expense> {
        self.expenses.read().map(|guard| guard.to_vec()).unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Validation("User already exists".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list_expenses(&self, user_id: &str, range: Option<DateRange>) -> AppResult<Vec<Expense>> {
        let expenses = self.expenses.read().map_err(poisoned)?;
        let mut owned: Vec<Expense> = expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| range.map_or(true, |r| (r.start..r.end).contains(&e.date)))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(owned)
    }

    async fn insert_expense(&self, expense: NewExpense) -> AppResult<Expense> {
        let created = Expense {
            id: ObjectId::new().to_hex(),
            user_id: expense.user_id,
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
        };
        self.expenses.write().map_err(poisoned)?.push(created.clone());
        Ok(created)
    }

    async fn find_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>> {
        let expenses = self.expenses.read().map_err(poisoned)?;
        Ok(expenses
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn update_expense(
        &self,
        user_id: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> AppResult<Option<Expense>> {
        let mut expenses = self.expenses.write().map_err(poisoned)?;
        Ok(expenses
            .iter_mut()
            .find(|e| e.id == id && e.user_id == user_id)
            .map(|e| {
                if let Some(description) = &changes.description {
                    e.description = description.clone();
                }
                if let Some(amount) = changes.amount {
                    e.amount = amount;
                }
                if let Some(date) = changes.date {
                    e.date = date;
                }
                e.clone()
            }))
    }

    async fn delete_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>> {
        let mut expenses = self.expenses.write().map_err(poisoned)?;
        let position = expenses
            .iter()
            .position(|e| e.id == id && e.user_id == user_id);
        Ok(position.map(|i| expenses.remove(i)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
