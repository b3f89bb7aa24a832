use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};

use super::{MongoDB, UserStore};
use crate::models::User;
use crate::utils::{AppError, AppResult};

pub(super) const COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    _id: Option<ObjectId>,
    user_id: String,
    email: String,
    password: String,
    created_at: Option<BsonDateTime>,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            user_id: doc.user_id,
            email: doc.email,
            password_hash: doc.password,
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let found = self
            .collection::<UserDocument>(COLLECTION)
            .find_one(doc! { "email": email })
            .await?;
        Ok(found.map(User::from))
    }

    async fn find_user_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let found = self
            .collection::<UserDocument>(COLLECTION)
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(found.map(User::from))
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        let document = UserDocument {
            _id: None,
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            created_at: Some(BsonDateTime::now()),
        };

        match self.collection::<UserDocument>(COLLECTION).insert_one(&document).await {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent registration for the same email
            Err(e) if is_duplicate_key(&e) => Err(AppError::Validation("User already exists".to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
