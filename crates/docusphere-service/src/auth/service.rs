//! Authentication service: registration, login and token resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use docusphere_auth::{ClientInfo, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use docusphere_core::config::AuthConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_database::store::{AccountStore, LoginAttemptStore};
use docusphere_entity::account::{
    Account, AccountRole, CreateAccount, Identity, default_avatar_url,
};
use docusphere_entity::login::CreateLoginAttempt;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Self-registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Where a login request came from.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Remote IP address.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Session token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The account that logged in.
    pub account: Account,
}

/// Trim, lower-case and sanity check an email address.
pub(crate) fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AppError::validation("Invalid email address")
            .with_details(json!({ "email": "Invalid email address" })));
    }
    Ok(email)
}

/// Handles registration, login and token resolution.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    logins: Arc<dyn LoginAttemptStore>,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("encoder", &self.encoder)
            .finish()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        logins: Arc<dyn LoginAttemptStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            accounts,
            logins,
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        }
    }

    /// Register a new Viewer account.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<Account> {
        let name = req.name.trim();
        let email = req.email.trim();
        let password = req.password.as_str();

        let mut missing = Map::new();
        for (field, value) in [("name", name), ("email", email), ("password", password.trim())] {
            if value.is_empty() {
                missing.insert(field.to_string(), Value::from(format!("{field} is required")));
            }
        }
        if !missing.is_empty() {
            return Err(AppError::validation("Missing required fields")
                .with_details(Value::Object(missing)));
        }

        let email = normalize_email(email)?;
        self.validator.validate(password)?;
        let password_hash = self.hasher.hash(password)?;

        let account = self
            .accounts
            .create(&CreateAccount {
                name: name.to_string(),
                email,
                password_hash,
                role: AccountRole::Viewer,
                avatar_url: Some(default_avatar_url(name)),
            })
            .await?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Check credentials and issue a session token.
    ///
    /// Every attempt is logged, successful or not. Unknown emails and wrong
    /// passwords produce the same error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientMeta,
    ) -> AppResult<LoginResult> {
        let email = email.trim().to_lowercase();
        let account = self.accounts.find_by_email(&email).await?;

        let outcome = match &account {
            None => Err("account not found"),
            Some(account) if !self.hasher.verify(password, &account.password_hash) => {
                Err("invalid password")
            }
            Some(_) => Ok(()),
        };

        self.record_attempt(&email, account.as_ref(), client, outcome.err())
            .await;

        match (account, outcome) {
            (Some(account), Ok(())) => {
                let session = self.encoder.issue(&account)?;
                info!(account_id = %account.id, ip = %client.ip_address, "Login succeeded");
                Ok(LoginResult {
                    token: session.token,
                    expires_at: session.expires_at,
                    account,
                })
            }
            (_, outcome) => {
                warn!(
                    email = %email,
                    ip = %client.ip_address,
                    reason = outcome.err().unwrap_or_default(),
                    "Login failed"
                );
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    /// Resolve a session token into the caller's identity.
    pub fn resolve(&self, token: &str) -> AppResult<Identity> {
        Ok(self.decoder.decode(token)?.identity())
    }

    async fn record_attempt(
        &self,
        email: &str,
        account: Option<&Account>,
        client: &ClientMeta,
        failure: Option<&str>,
    ) {
        let user_agent = client.user_agent.clone().unwrap_or_default();
        let info = ClientInfo::from_user_agent(&user_agent);
        let attempt = CreateLoginAttempt {
            account_id: account.map(|a| a.id),
            email: email.to_string(),
            ip_address: client.ip_address.clone(),
            user_agent,
            browser: info.browser,
            os: info.os,
            device: info.device,
            country: None,
            success: failure.is_none(),
            failure_reason: failure.map(str::to_string),
        };
        if let Err(e) = self.logins.record(&attempt).await {
            warn!(email = %email, error = %e, "Failed to record login attempt");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use docusphere_core::error::ErrorKind;
    use docusphere_database::memory::{MemoryAccountStore, MemoryLoginAttemptStore};

    struct Fixture {
        auth: AuthService,
        logins: Arc<MemoryLoginAttemptStore>,
    }

    fn fixture() -> Fixture {
        let logins = Arc::new(MemoryLoginAttemptStore::new());
        let auth = AuthService::new(
            Arc::new(MemoryAccountStore::new()),
            logins.clone(),
            &AuthConfig::default(),
        );
        Fixture { auth, logins }
    }

    fn awa() -> RegisterRequest {
        RegisterRequest {
            name: " Awa Diop ".to_string(),
            email: "Awa@Example.com".to_string(),
            password: "s3cret-pass".to_string(),
        }
    }

    fn chrome() -> ClientMeta {
        ClientMeta {
            ip_address: "10.0.0.7".to_string(),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }

    async fn attempts(f: &Fixture) -> Vec<docusphere_entity::login::LoginAttempt> {
        f.logins
            .find_since(Utc::now() - Duration::hours(1))
            .await
            .unwrap()
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" A@B.io ").unwrap(), "a@b.io");
        assert!(normalize_email("nobody").is_err());
        assert!(normalize_email("@b.io").is_err());
        assert!(normalize_email("a@localhost").is_err());
    }

    #[tokio::test]
    async fn test_register_defaults() {
        let f = fixture();
        let account = f.auth.register(awa()).await.unwrap();
        assert_eq!(account.name, "Awa Diop");
        assert_eq!(account.email, "awa@example.com");
        assert_eq!(account.role, AccountRole::Viewer);
        assert_ne!(account.password_hash, "s3cret-pass");
        assert!(account.avatar_url.unwrap().contains("seed=Awa%20Diop"));
    }

    #[tokio::test]
    async fn test_register_reports_missing_fields() {
        let f = fixture();
        let err = f
            .auth
            .register(RegisterRequest {
                name: " ".to_string(),
                email: "a@b.io".to_string(),
                password: "".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let details = err.details.unwrap();
        assert!(details.get("name").is_some());
        assert!(details.get("password").is_some());
        assert!(details.get("email").is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_and_duplicates() {
        let f = fixture();
        let err = f
            .auth
            .register(RegisterRequest {
                password: "abc".to_string(),
                ..awa()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        f.auth.register(awa()).await.unwrap();
        let err = f.auth.register(awa()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_issues_resolvable_token() {
        let f = fixture();
        let account = f.auth.register(awa()).await.unwrap();

        let result = f
            .auth
            .login("AWA@example.com", "s3cret-pass", &chrome())
            .await
            .unwrap();
        assert_eq!(result.account.id, account.id);
        assert!(result.expires_at > Utc::now());

        let identity = f.auth.resolve(&result.token).unwrap();
        assert_eq!(identity.account_id, account.id);
        assert_eq!(identity.role, AccountRole::Viewer);

        let log = attempts(&f).await;
        assert_eq!(log.len(), 1);
        assert!(log[0].success);
        assert_eq!(log[0].browser, "Chrome");
        assert_eq!(log[0].os, "Windows");
        assert_eq!(log[0].device, "desktop");
    }

    #[tokio::test]
    async fn test_failed_logins_are_generic_and_logged() {
        let f = fixture();
        f.auth.register(awa()).await.unwrap();

        let wrong = f
            .auth
            .login("awa@example.com", "nope", &chrome())
            .await
            .unwrap_err();
        let unknown = f
            .auth
            .login("ghost@example.com", "nope", &ClientMeta::default())
            .await
            .unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Unauthorized);
        assert_eq!(wrong.message, unknown.message);

        let log = attempts(&f).await;
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|a| !a.success));
        let reasons: Vec<_> = log.iter().filter_map(|a| a.failure_reason.as_deref()).collect();
        assert!(reasons.contains(&"invalid password"));
        assert!(reasons.contains(&"account not found"));
        let unknown_attempt = log.iter().find(|a| a.email == "ghost@example.com").unwrap();
        assert_eq!(unknown_attempt.device, "desktop");
        assert!(unknown_attempt.account_id.is_none());
    }

    #[tokio::test]
    async fn test_password_is_kept_verbatim() {
        let f = fixture();
        f.auth
            .register(RegisterRequest {
                password: " s3cret-pass ".to_string(),
                ..awa()
            })
            .await
            .unwrap();

        assert!(f.auth.login("awa@example.com", " s3cret-pass ", &chrome()).await.is_ok());
        let err = f
            .auth
            .login("awa@example.com", "s3cret-pass", &chrome())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage() {
        let f = fixture();
        assert_eq!(
            f.auth.resolve("not-a-token").unwrap_err().kind,
            ErrorKind::Unauthorized
        );
    }
}
