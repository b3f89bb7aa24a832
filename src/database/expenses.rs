use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};

use super::{ExpenseStore, MongoDB};
use crate::models::{DateRange, Expense, ExpenseChanges, NewExpense};
use crate::utils::AppResult;

pub(super) const COLLECTION: &str = "expenses";

/// Shape of an expense inside MongoDB
#[derive(Debug, Serialize, Deserialize)]
struct ExpenseDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    user_id: String,
    description: String,
    amount: f64,
    date: BsonDateTime,
}

impl From<ExpenseDocument> for Expense {
    fn from(doc: ExpenseDocument) -> Self {
        Expense {
            id: doc.id.to_hex(),
            user_id: doc.user_id,
            description: doc.description,
            amount: doc.amount,
            date: from_bson_date(doc.date),
        }
    }
}

fn to_bson_date(date: &DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(date.timestamp_millis())
}

fn from_bson_date(date: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(date.timestamp_millis()).unwrap_or_default()
}

/// `{_id, user_id}` filter, or `None` when the id can't be an ObjectId and so
/// can't match anything.
fn owned_by(user_id: &str, id: &str) -> Option<Document> {
    let object_id = ObjectId::parse_str(id).ok()?;
    Some(doc! { "_id": object_id, "user_id": user_id })
}

#[async_trait]
impl ExpenseStore for MongoDB {
    async fn list_expenses(&self, user_id: &str, range: Option<DateRange>) -> AppResult<Vec<Expense>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(range) = range {
            filter.insert(
                "date",
                doc! { "$gte": to_bson_date(&range.start), "$lt": to_bson_date(&range.end) },
            );
        }

        let cursor = self
            .collection::<ExpenseDocument>(COLLECTION)
            .find(filter)
            .sort(doc! { "date": -1 })
            .await?;

        let documents: Vec<ExpenseDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Expense::from).collect())
    }

    async fn insert_expense(&self, expense: NewExpense) -> AppResult<Expense> {
        let document = ExpenseDocument {
            id: ObjectId::new(),
            user_id: expense.user_id,
            description: expense.description,
            amount: expense.amount,
            date: to_bson_date(&expense.date),
        };

        self.collection::<ExpenseDocument>(COLLECTION)
            .insert_one(&document)
            .await?;

        Ok(Expense::from(document))
    }

    async fn find_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>> {
        let Some(filter) = owned_by(user_id, id) else {
            return Ok(None);
        };

        let found = self
            .collection::<ExpenseDocument>(COLLECTION)
            .find_one(filter)
            .await?;

        Ok(found.map(Expense::from))
    }

    async fn update_expense(
        &self,
        user_id: &str,
        id: &str,
        changes: &ExpenseChanges,
    ) -> AppResult<Option<Expense>> {
        // An empty $set is rejected by the server
        if changes.is_empty() {
            return self.find_expense(user_id, id).await;
        }

        let Some(filter) = owned_by(user_id, id) else {
            return Ok(None);
        };

        let mut set = Document::new();
        if let Some(description) = &changes.description {
            set.insert("description", description.as_str());
        }
        if let Some(amount) = changes.amount {
            set.insert("amount", amount);
        }
        if let Some(date) = &changes.date {
            set.insert("date", to_bson_date(date));
        }

        let updated = self
            .collection::<ExpenseDocument>(COLLECTION)
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated.map(Expense::from))
    }

    async fn delete_expense(&self, user_id: &str, id: &str) -> AppResult<Option<Expense>> {
        let Some(filter) = owned_by(user_id, id) else {
            return Ok(None);
        };

        let deleted = self
            .collection::<ExpenseDocument>(COLLECTION)
            .find_one_and_delete(filter)
            .await?;

        Ok(deleted.map(Expense::from))
    }

    async fn ping(&self) -> AppResult<()> {
        self.database().list_collection_names().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_matches_nothing() {
        assert!(owned_by("u1", "not-an-object-id").is_none());
        assert!(owned_by("u1", "").is_none());
    }

    #[test]
    fn owner_filter_pins_both_fields() {
        let id = ObjectId::new();
        let filter = owned_by("u1", &id.to_hex()).unwrap();
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_str("user_id").unwrap(), "u1");
    }

    #[test]
    fn bson_dates_keep_millisecond_precision() {
        let date = DateTime::parse_from_rfc3339("2024-03-05T10:15:30.250Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(from_bson_date(to_bson_date(&date)), date);
    }
}
