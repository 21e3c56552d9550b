//! API commands for AccountStack resources
//!
//! One typed method per REST operation on users, accounts, transactions
//! and insights. Every method shares the [`ApiClient`] policy: bearer token
//! when one is stored, envelope unwrapping, and categorized errors.

use std::sync::Arc;

use accountstack_domain::{
    Account, AccountDraft, Insight, InsightFilters, Transaction, TransactionDraft,
    TransactionFilters, User,
};
use reqwest::Method;
use tracing::{debug, instrument};
use urlencoding::encode;

use super::client::{reject, ApiClient};
use super::errors::ApiError;

/// API commands for domain operations
#[derive(Clone)]
pub struct ApiCommands {
    client: Arc<ApiClient>,
}

impl ApiCommands {
    /// Create a new commands instance
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // === User ===

    /// Get the signed-in user
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.client.get("/accounts/me").await
    }

    // === Accounts ===

    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let accounts: Vec<Account> = self.client.get("/accounts").await?;
        debug!(count = accounts.len(), "Accounts fetched");
        Ok(accounts)
    }

    /// Get an account by ID
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] without sending anything if `id` is
    /// empty.
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn get_account(&self, id: &str) -> Result<Account, ApiError> {
        let path = resource_path("/accounts", id, None)?;
        self.client.get(&path).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create_account(&self, draft: &AccountDraft) -> Result<Account, ApiError> {
        let account: Account = self.client.post("/accounts", draft).await?;
        debug!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// Update an account. Only the fields set on `draft` are sent.
    #[instrument(skip(self, draft), fields(account_id = %id))]
    pub async fn update_account(&self, id: &str, draft: &AccountDraft) -> Result<Account, ApiError> {
        let path = resource_path("/accounts", id, None)?;
        self.client.put(&path, draft).await
    }

    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn delete_account(&self, id: &str) -> Result<(), ApiError> {
        let path = resource_path("/accounts", id, None)?;
        self.client.delete(&path).await?;
        debug!(account_id = %id, "Account deleted");
        Ok(())
    }

    // === Transactions ===

    /// List transactions
    ///
    /// `filters` are sent verbatim as query parameters; unset fields are
    /// omitted.
    #[instrument(skip(self, filters))]
    pub async fn list_transactions(
        &self,
        filters: Option<&TransactionFilters>,
    ) -> Result<Vec<Transaction>, ApiError> {
        match filters {
            Some(filters) => self.client.get_with_query("/transactions", filters).await,
            None => self.client.get("/transactions").await,
        }
    }

    #[instrument(skip(self), fields(transaction_id = %id))]
    pub async fn get_transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        let path = resource_path("/transactions", id, None)?;
        self.client.get(&path).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ApiError> {
        let transaction: Transaction = self.client.post("/transactions", draft).await?;
        debug!(transaction_id = %transaction.id, "Transaction created");
        Ok(transaction)
    }

    // === Insights ===

    #[instrument(skip(self, filters))]
    pub async fn list_insights(
        &self,
        filters: Option<&InsightFilters>,
    ) -> Result<Vec<Insight>, ApiError> {
        match filters {
            Some(filters) => self.client.get_with_query("/insights", filters).await,
            None => self.client.get("/insights").await,
        }
    }

    #[instrument(skip(self), fields(insight_id = %id))]
    pub async fn get_insight(&self, id: &str) -> Result<Insight, ApiError> {
        let path = resource_path("/insights", id, None)?;
        self.client.get(&path).await
    }

    #[instrument(skip(self), fields(insight_id = %id))]
    pub async fn dismiss_insight(&self, id: &str) -> Result<(), ApiError> {
        let path = resource_path("/insights", id, Some("dismiss"))?;
        self.client.send_empty(Method::PATCH, &path).await
    }

    /// Record that the user acted on an insight
    #[instrument(skip(self), fields(insight_id = %id))]
    pub async fn take_insight_action(&self, id: &str) -> Result<(), ApiError> {
        let path = resource_path("/insights", id, Some("action"))?;
        self.client.send_empty(Method::POST, &path).await
    }
}

/// `{collection}/{id}[/{action}]` with `id` percent-encoded as one segment.
fn resource_path(collection: &str, id: &str, action: Option<&str>) -> Result<String, ApiError> {
    if id.is_empty() {
        return Err(reject(ApiError::Request(format!(
            "{} id must not be empty",
            collection.trim_start_matches('/')
        ))));
    }

    let mut path = format!("{collection}/{}", encode(id));
    if let Some(action) = action {
        path.push('/');
        path.push_str(action);
    }
    Ok(path)
}
