//! Account management: admin CRUD plus profile and password self-service.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::info;
use uuid::Uuid;

use docusphere_auth::{AccessEvaluator, PasswordHasher, PasswordValidator};
use docusphere_core::config::AuthConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_database::store::AccountStore;
use docusphere_entity::account::{
    Account, AccountRole, CreateAccount, UpdateAccount, default_avatar_url,
};

use crate::auth::service::normalize_email;
use crate::context::RequestContext;

/// Account created by an Admin.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role, Viewer when absent.
    #[serde(default)]
    pub role: Option<AccountRole>,
    /// Avatar URL, generated when absent.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Profile fields that may change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
    /// New role. Admin only.
    pub role: Option<AccountRole>,
}

/// Password change input.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password, required when changing one's own password.
    #[serde(default)]
    pub current_password: Option<String>,
    /// New password.
    pub new_password: String,
}

/// Account administration and self-service.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    access: AccessEvaluator,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish()
    }
}

fn not_found() -> AppError {
    AppError::not_found("User not found")
}

fn non_blank(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            let message = format!("{field} cannot be empty");
            let mut details = Map::new();
            details.insert(field.to_string(), Value::from(message.clone()));
            Err(AppError::validation(message).with_details(Value::Object(details)))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(accounts: Arc<dyn AccountStore>, config: &AuthConfig) -> Self {
        Self {
            accounts,
            access: AccessEvaluator::new(),
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        }
    }

    /// Every account. Admin only.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Account>> {
        self.access.require_admin(ctx)?;
        self.accounts.list().await
    }

    /// Create an account with any role. Admin only.
    pub async fn create(&self, ctx: &RequestContext, req: CreateAccountRequest) -> AppResult<Account> {
        self.access.require_admin(ctx)?;

        let name = non_blank("name", Some(req.name))?.unwrap_or_default();
        let email = normalize_email(&req.email)?;
        self.validator.validate(&req.password)?;
        let avatar_url = non_blank("avatar_url", req.avatar_url)?
            .unwrap_or_else(|| default_avatar_url(&name));

        let account = self
            .accounts
            .create(&CreateAccount {
                password_hash: self.hasher.hash(&req.password)?,
                role: req.role.unwrap_or_default(),
                avatar_url: Some(avatar_url),
                name,
                email,
            })
            .await?;

        info!(
            admin_id = %ctx.account_id(),
            account_id = %account.id,
            role = %account.role,
            "Account created"
        );
        Ok(account)
    }

    /// Any account, for any authenticated caller.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<Account> {
        self.accounts.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Update profile fields and, for Admins, the role. Self or Admin.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAccountRequest,
    ) -> AppResult<Account> {
        self.access.require_self_or_admin(ctx, id)?;
        if req.role.is_some() {
            self.access.require_admin(ctx)?;
        }

        let update = UpdateAccount {
            name: non_blank("name", req.name)?,
            email: match req.email {
                Some(email) => Some(normalize_email(&email)?),
                None => None,
            },
            password_hash: None,
            role: req.role,
            avatar_url: non_blank("avatar_url", req.avatar_url)?,
        };
        if update.is_empty() {
            return self.get(ctx, id).await;
        }

        let account = self.accounts.update(id, &update).await?.ok_or_else(not_found)?;
        info!(actor_id = %ctx.account_id(), account_id = %id, "Account updated");
        Ok(account)
    }

    /// Change name, email or avatar. Self or Admin.
    pub async fn change_info(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateAccountRequest,
    ) -> AppResult<Account> {
        if req.name.is_none() && req.email.is_none() && req.avatar_url.is_none() {
            return Err(AppError::validation("Nothing to update"));
        }
        self.update(
            ctx,
            id,
            UpdateAccountRequest {
                role: None,
                ..req
            },
        )
        .await
    }

    /// Change a password. Callers changing their own password must give the
    /// current one; Admins resetting someone else's need not.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: ChangePasswordRequest,
    ) -> AppResult<()> {
        self.access.require_self_or_admin(ctx, id)?;
        let account = self.accounts.find_by_id(id).await?.ok_or_else(not_found)?;

        if ctx.account_id() == id {
            let current = req.current_password.as_deref().unwrap_or_default();
            if !self.hasher.verify(current, &account.password_hash) {
                return Err(AppError::validation("Current password is incorrect")
                    .with_details(json!({ "current_password": "Current password is incorrect" })));
            }
            self.validator.validate_not_same(current, &req.new_password)?;
        }
        self.validator.validate(&req.new_password)?;

        let update = UpdateAccount {
            password_hash: Some(self.hasher.hash(&req.new_password)?),
            ..Default::default()
        };
        self.accounts.update(id, &update).await?.ok_or_else(not_found)?;

        info!(actor_id = %ctx.account_id(), account_id = %id, "Password changed");
        Ok(())
    }

    /// Delete an account. Admin only, and never one's own.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.access.require_admin(ctx)?;
        if ctx.account_id() == id {
            return Err(AppError::forbidden("You cannot delete your own account"));
        }
        if !self.accounts.delete(id).await? {
            return Err(not_found());
        }
        info!(admin_id = %ctx.account_id(), account_id = %id, "Account deleted");
        Ok(())
    }
}
