//! User persistence over the `users` collection.
//!
//! Reads go cache-aside through Redis with a short TTL; a cache failure is
//! never fatal for a read, the database remains the source of truth.

use mongodb::bson::{DateTime, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

use crate::caching::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use crate::domain::entities::User;

const COLLECTION: &str = "users";
const CACHE_TTL_SECONDS: u64 = 600;

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
    cache: RedisClient,
}

impl UserRepository {
    pub fn new(db: Database, cache: RedisClient) -> Self {
        Self { db, cache }
    }

    fn collection(&self) -> mongodb::Collection<User> {
        self.db.collection(COLLECTION)
    }

    /// Creates the unique indexes on email and username. Called best-effort
    /// at boot; when the database is down the indexes are simply created on
    /// a later boot.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        for field in ["email", "username"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.collection()
                .create_index(index)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        }
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let cache_key = format!("user:email:{email}");

        if let Ok(Some(cached)) = self.cache.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self
                .cache
                .set_with_expiry(&cache_key, user, CACHE_TTL_SECONDS)
                .await;
        }

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.collection()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = parse_object_id(id)?;
        let cache_key = format!("user:id:{id}");

        if let Ok(Some(cached)) = self.cache.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self
                .cache
                .set_with_expiry(&cache_key, user, CACHE_TTL_SECONDS)
                .await;
        }

        Ok(user)
    }

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// `ConflictError` when the email or username is already taken.
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("Email is already registered".to_string()));
        }

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError("Username is already taken".to_string()));
        }

        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        user.id = result.inserted_id.as_object_id();

        Ok(user)
    }

    /// Replaces the stored document and invalidates both cache entries.
    pub async fn update(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("cannot update a user without an id".to_string()))?;

        self.collection()
            .replace_one(doc! { "_id": id }, user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(user).await;

        Ok(())
    }

    pub async fn record_login(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::InternalError("cannot update a user without an id".to_string()))?;

        self.collection()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "last_login_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_cache(user).await;

        Ok(())
    }

    async fn invalidate_cache(&self, user: &User) {
        if let Some(id) = user.id_string() {
            let _ = self.cache.del(&format!("user:id:{id}")).await;
        }
        let _ = self.cache.del(&format!("user:email:{}", user.email)).await;
    }
}

fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        assert!(matches!(
            parse_object_id("not-a-hex-id"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }
}
