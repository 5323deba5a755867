//! Password policy for new passwords.

use docusphere_core::config::AuthConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Check a new password.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        if password.trim().is_empty() {
            return Err(AppError::validation("Password is required"));
        }
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Check that a new password differs from the current one.
    pub fn validate_not_same(&self, current: &str, new: &str) -> AppResult<()> {
        if current == new {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}
