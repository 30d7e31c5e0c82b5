//! Repository pattern implementation for the data access layer

use crate::core::error::{ApiError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::User;
use rusqlite::OptionalExtension;
use std::sync::Arc;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, created_at";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        password_hash: row.get(4)?,
        role: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!(
                        "SELECT {} FROM users WHERE email = ? COLLATE NOCASE",
                        USER_COLUMNS
                    ),
                    [&email],
                    row_to_user,
                )
                .optional()
                .map_err(ApiError::Database)
            })
            .await
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                    [&id],
                    row_to_user,
                )
                .optional()
                .map_err(ApiError::Database)
            })
            .await
    }

    /// Insert a new user row
    ///
    /// The store's UNIQUE constraint on email is the authoritative duplicate
    /// guard: a constraint violation here (from a registration racing past the
    /// handler's pre-check) is reported as Conflict, not as a server error.
    pub async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                let result = conn.execute(
                    "INSERT INTO users (id, name, email, phone, password_hash, role, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &user.id,
                        &user.name,
                        &user.email,
                        &user.phone,
                        &user.password_hash,
                        &user.role,
                        &user.created_at,
                    ],
                );

                match result {
                    Ok(_) => Ok(()),
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                    {
                        Err(ApiError::Conflict(
                            "User with this email already exists".to_string(),
                        ))
                    }
                    Err(e) => Err(ApiError::Database(e)),
                }
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .map_err(ApiError::Database)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_repo() -> UserRepository {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        UserRepository::new(db)
    }

    fn test_user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            phone: "(11) 91234-5678".to_string(),
            password_hash: "$2b$12$not-a-real-hash".to_string(),
            role: "user".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = test_repo();
        repo.create(&test_user("u-1", "ana@example.com")).await.unwrap();

        let found = repo.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some("u-1".to_string()));
    }

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let repo = test_repo();
        repo.create(&test_user("u-1", "ana@example.com")).await.unwrap();

        let found = repo.find_by_email("ANA@Example.COM").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_find_by_email_absent() {
        let repo = test_repo();
        let found = repo.find_by_email("nobody@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_reported_as_conflict() {
        let repo = test_repo();
        repo.create(&test_user("u-1", "ana@example.com")).await.unwrap();

        let err = repo
            .create(&test_user("u-2", "Ana@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // The losing insert must not leave a row behind
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = test_repo();
        repo.create(&test_user("u-7", "joao@example.com")).await.unwrap();

        let found = repo.find_by_id("u-7").await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("joao@example.com".to_string()));
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }
}
