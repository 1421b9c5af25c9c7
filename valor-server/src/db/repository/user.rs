//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate};
use shared::models::UserRole;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY member_since DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id("user", id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = normalize_email(email);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = normalize_email(&data.email);

        // Check duplicate email (the unique index is the final guard)
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        let now = shared::util::now_millis();

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    hash_pass = $hash_pass,
                    phone = $phone,
                    address = NONE,
                    role = $role,
                    member_since = $now,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("first_name", data.first_name.trim().to_string()))
            .bind(("last_name", data.last_name.trim().to_string()))
            .bind(("email", email))
            .bind(("hash_pass", hash_pass))
            .bind(("phone", data.phone))
            .bind(("role", data.role.as_str().to_string()))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Promote an existing user to admin
    pub async fn set_role(&self, id: &str, role: UserRole) -> RepoResult<User> {
        let thing = parse_record_id("user", id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET role = $role, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("role", role.as_str().to_string()))
            .bind(("now", shared::util::now_millis()))
            .await?;
        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }
}

/// Emails are stored trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
