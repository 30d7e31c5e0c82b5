//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// User record in the database
///
/// The password hash never leaves the store boundary in a response: it is
/// excluded from serialization entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Stored lowercased; uniqueness enforced case-insensitively by the store
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: "u-1".to_string(),
            name: "Demo User".to_string(),
            email: "demo@orcamentos.com".to_string(),
            phone: "(11) 91234-5678".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: "admin".to_string(),
            created_at: "2025-09-20T10:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$secret"));
    }
}
