//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateUser, User, UserClaims, UserInfo},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash a password with argon2 and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored argon2 hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a signed token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = user.id, "login rejected: wrong password");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "user logged in");
        Ok((token, user))
    }

    /// Create a JWT token for a user
    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let claims = UserClaims::new(user, Utc::now().timestamp(), self.config.jwt_expiration_hours);
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    pub async fn list(&self) -> AppResult<Vec<UserInfo>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserInfo> {
        self.repository.users.get_by_id(id).await.map(UserInfo::from)
    }

    pub async fn create_user(&self, data: CreateUser) -> AppResult<UserInfo> {
        data.validate()?;
        let password_hash = hash_password(&data.password)?;
        let user = self
            .repository
            .users
            .create(data.name.trim(), data.email.trim(), &password_hash, data.role)
            .await?;
        tracing::info!(user_id = user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn update_user(&self, id: i32, data: UpdateUser) -> AppResult<UserInfo> {
        data.validate()?;
        let password_hash = data.password.as_deref().map(hash_password).transpose()?;
        self.repository
            .users
            .update(
                id,
                data.name.as_deref().map(str::trim),
                data.email.as_deref().map(str::trim),
                password_hash.as_deref(),
            )
            .await
    }

    pub async fn update_role(&self, id: i32, role: Role) -> AppResult<UserInfo> {
        let user = self.repository.users.update_role(id, role).await?;
        tracing::info!(user_id = id, role = %role, "role changed");
        Ok(user)
    }

    /// Delete a user; an admin cannot delete their own account
    pub async fn delete_user(&self, id: i32, acting_user_id: i32) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::BusinessRule("You cannot delete your own account".to_string()));
        }
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, deleted_by = acting_user_id, "user deleted");
        Ok(())
    }

    /// Create the configured administrator when no admin account exists
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password) else {
            return Ok(());
        };
        if self.repository.users.admin_exists().await? {
            return Ok(());
        }
        let admin = self
            .create_user(CreateUser {
                name: bootstrap.admin_name.clone(),
                email: email.clone(),
                password: password.clone(),
                role: Role::Admin,
            })
            .await?;
        tracing::warn!(user_id = admin.id, email = %admin.email, "bootstrap administrator created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }
}
