//! Where the flat account list comes from
//!
//! Handlers only see [`AccountSource`]. The list is fetched fresh for every
//! request and the tree is rebuilt from it; nothing is cached here.

use std::path::Path;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::{debug, info};

use crate::entity::account;
use crate::error::AppResult;

#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Every account of the chart, in no particular order
    async fn list_accounts(&self) -> AppResult<Vec<account::Model>>;
}

/// Reads the account table
pub struct DbAccountSource {
    db: DatabaseConnection,
}

impl DbAccountSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountSource for DbAccountSource {
    async fn list_accounts(&self) -> AppResult<Vec<account::Model>> {
        let accounts = account::Entity::find()
            .order_by_asc(account::Column::Code)
            .all(&self.db)
            .await?;
        debug!("Loaded {} accounts from database", accounts.len());
        Ok(accounts)
    }
}

/// Fixed in-memory list (fixtures and `--seed` files)
#[derive(Debug, Clone, Default)]
pub struct StaticAccountSource {
    accounts: Vec<account::Model>,
}

impl StaticAccountSource {
    pub fn new(accounts: Vec<account::Model>) -> Self {
        Self { accounts }
    }

    /// Loads a JSON array of accounts
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let accounts: Vec<account::Model> = serde_json::from_str(&content)?;
        info!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(Self::new(accounts))
    }
}

#[async_trait]
impl AccountSource for StaticAccountSource {
    async fn list_accounts(&self) -> AppResult<Vec<account::Model>> {
        Ok(self.accounts.clone())
    }
}
