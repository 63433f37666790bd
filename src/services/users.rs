//! Account, credential and session service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterRequest, SessionClaims, UpdateProfile, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create an account. The username must be free; the password is stored as an argon2 hash.
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        if self.repository.users.username_exists(&request.username, None).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .create(&request.username, &hash, request.nickname.as_deref())
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials. `None` for an unknown user or a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let Some(row) = self.repository.users.get_credentials(username).await? else {
            return Ok(None);
        };

        if !verify_password(&row.password_hash, password)? {
            return Ok(None);
        }

        Ok(Some(row.into()))
    }

    /// Authenticate and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = match self.authenticate(username, password).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %username, "Failed login attempt");
                return Err(AppError::Authentication("Invalid username or password".to_string()));
            }
        };

        let token = self.issue_token(&user)?;
        tracing::debug!(user_id = user.id, "Session token issued");
        Ok((token, user))
    }

    /// Sign a session token for a user
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        SessionClaims::new(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify a session token. Any failure is an authentication error.
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AppError::Authentication("Invalid or expired token".to_string())
        })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Update nickname and/or password. Changing the password requires the current one.
    pub async fn update_profile(&self, user_id: i32, profile: &UpdateProfile) -> AppResult<User> {
        let new_hash = match profile.new_password.as_deref() {
            Some(new_password) => {
                let current = profile.current_password.as_deref().ok_or_else(|| {
                    AppError::Validation("Current password is required to change password".to_string())
                })?;

                let row = self
                    .repository
                    .users
                    .get_credentials_by_id(user_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

                if !verify_password(&row.password_hash, current)? {
                    tracing::warn!(user_id, "Password change with wrong current password");
                    return Err(AppError::Authentication("Current password is incorrect".to_string()));
                }

                Some(hash_password(new_password)?)
            }
            None => None,
        };

        let user = self
            .repository
            .users
            .update(user_id, profile.nickname.as_deref(), new_hash.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id, password_changed = new_hash.is_some(), "Profile updated");
        Ok(user)
    }

    /// Delete the account; owned lists and statuses go with it
    pub async fn delete_account(&self, user_id: i32) -> AppResult<()> {
        if !self.repository.users.delete(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!(user_id, "User deleted");
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
