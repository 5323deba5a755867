//! In-memory account store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_entity::account::{Account, CreateAccount, UpdateAccount};

use crate::store::AccountStore;

/// Account store backed by a concurrent hash map with a unique email index.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<Uuid, Account>,
    by_email: DashMap<String, Uuid>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let id = self.by_email.get(&email.to_lowercase()).map(|id| *id.value());
        Ok(id.and_then(|id| self.accounts.get(&id).map(|a| a.value().clone())))
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts.iter().map(|a| a.value().clone()).collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let email = data.email.to_lowercase();
        match self.by_email.entry(email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Email already in use")),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let account = Account {
                    id: Uuid::now_v7(),
                    name: data.name.clone(),
                    email,
                    password_hash: data.password_hash.clone(),
                    role: data.role,
                    avatar_url: data.avatar_url.clone(),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(account.id);
                self.accounts.insert(account.id, account.clone());
                Ok(account)
            }
        }
    }

    async fn update(&self, id: Uuid, data: &UpdateAccount) -> AppResult<Option<Account>> {
        let Some(current_email) = self.accounts.get(&id).map(|a| a.email.clone()) else {
            return Ok(None);
        };

        // Reserve the new email before touching the row; the index lock is
        // never taken while a row lock is held.
        let new_email = data.email.as_ref().map(|e| e.to_lowercase());
        if let Some(email) = new_email.as_ref().filter(|e| **e != current_email) {
            match self.by_email.entry(email.clone()) {
                Entry::Occupied(_) => return Err(AppError::conflict("Email already in use")),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.by_email.remove(&current_email);
        }

        let Some(mut account) = self.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = new_email {
            account.email = email;
        }
        if let Some(name) = &data.name {
            account.name = name.clone();
        }
        if let Some(hash) = &data.password_hash {
            account.password_hash = hash.clone();
        }
        if let Some(role) = data.role {
            account.role = role;
        }
        if let Some(avatar) = &data.avatar_url {
            account.avatar_url = Some(avatar.clone());
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.accounts.remove(&id) {
            Some((_, account)) => {
                self.by_email.remove(&account.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docusphere_core::error::ErrorKind;
    use docusphere_entity::account::AccountRole;

    fn new_account(email: &str) -> CreateAccount {
        CreateAccount {
            name: "Awa".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: AccountRole::Viewer,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_email_is_unique_and_case_insensitive() {
        let store = MemoryAccountStore::new();
        let created = store.create(&new_account("Awa@Example.com")).await.unwrap();
        assert_eq!(created.email, "awa@example.com");

        let err = store.create(&new_account("awa@example.COM")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let found = store.find_by_email("AWA@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_update_moves_email_index() {
        let store = MemoryAccountStore::new();
        let first = store.create(&new_account("one@example.com")).await.unwrap();
        store.create(&new_account("two@example.com")).await.unwrap();

        let taken = UpdateAccount {
            email: Some("two@example.com".to_string()),
            ..Default::default()
        };
        let err = store.update(first.id, &taken).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let free = UpdateAccount {
            email: Some("three@example.com".to_string()),
            ..Default::default()
        };
        store.update(first.id, &free).await.unwrap().unwrap();
        assert!(store.find_by_email("one@example.com").await.unwrap().is_none());
        assert!(store.find_by_email("three@example.com").await.unwrap().is_some());
    }
}
