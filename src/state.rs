use std::sync::Arc;

use crate::config::AuthConfig;
use crate::database::{ExpenseStore, MongoDB, UserStore};

/// Shared by every worker through `web::Data`. The stores are the only path to
/// persistent state.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub expenses: Arc<dyn ExpenseStore>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, expenses: Arc<dyn ExpenseStore>, auth: AuthConfig) -> Self {
        Self { users, expenses, auth }
    }

    pub fn with_mongodb(db: MongoDB, auth: AuthConfig) -> Self {
        let db = Arc::new(db);
        Self::new(db.clone(), db, auth)
    }
}
