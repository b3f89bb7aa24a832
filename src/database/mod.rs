mod expenses;
#[cfg(test)]
pub mod memory;
mod users;

use async_trait::async_trait;
use mongodb::{Client, Collection, Database};
use std::error::Error;

use crate::config::database_name;
use crate::models::{DateRange, Expense, ExpenseChanges, NewExpense, User};
use crate::utils::AppResult;

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: &str) -> AppResult<Option<User>>;

    /// Fails with a validation error if the email is already registered.
    async fn insert_user(&self, user: &User) -> AppResult<()>;
}

/// Expense storage. Every method takes the owner's id and must include it in
/// the query, so a record belonging to another user behaves exactly like a
/// missing one.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Owner's expenses, newest first, optionally restricted to `range`.
    async fn list_expenses(&self, user_id: &str, range: Option<DateRange>) -> AppResult<Vec<Expense>>;

    async fn insert_expense(&self, expense: NewExpense) -> AppResult<Expense>;

    async fn find_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>>;

    /// Atomic find-and-update by id and owner. Returns the updated record.
    async fn update_expense(
        &self,
        user_id: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> AppResult<Option<Expense>>;

    /// Atomic find-and-delete by id and owner. Returns the removed record.
    async fn delete_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>>;

    /// Connectivity check for `/health`.
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("expense-tracker".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&database_name(uri));

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the owner-scoped queries and the unique email rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.database().collection::<mongodb::bson::Document>(users::COLLECTION);

        // Not best-effort: registration relies on this one
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users.create_index(email_index).await?;
        log::info!("   ✅ Index created: users(email) unique");

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // expenses(user_id, date desc) - list + date range filter
        let expenses = self.database().collection::<mongodb::bson::Document>(expenses::COLLECTION);

        let expenses_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "date": -1 })
            .build();

        match expenses.create_index(expenses_index).await {
            Ok(_) => log::info!("   ✅ Index created: expenses(user_id, date)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
