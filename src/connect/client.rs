//! Payments connect client.
//!
//! Stripe Connect is reached through the backend's HTTP functions; the
//! backend holds the Stripe secret and this client only forwards the user's
//! access token.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::types::{ConnectStatus, CreatedAccount, LinkMode, OnboardingLink};
use crate::error::{ElecMateError, Result};

const STATUS_FUNCTION: &str = "get-stripe-connect-status";
const CREATE_FUNCTION: &str = "create-stripe-connect-account";
const LINK_FUNCTION: &str = "get-stripe-onboarding-link";
const DISCONNECT_FUNCTION: &str = "disconnect-stripe-connect";

/// Stripe Connect operations
#[async_trait]
pub trait PaymentsConnect: Send + Sync {
    /// Current connection status
    async fn status(&self) -> Result<ConnectStatus>;

    /// Create a connected account and return its onboarding URL
    async fn create_account(&self, business_name: &str, email: &str) -> Result<CreatedAccount>;

    /// Fresh link to the onboarding flow or the Express dashboard
    async fn onboarding_link(&self, mode: LinkMode) -> Result<OnboardingLink>;

    /// Detach the connected account
    async fn disconnect(&self) -> Result<()>;
}

/// Configuration for the functions client
#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client invoking `POST {base_url}/functions/v1/<name>`
pub struct FunctionsConnectClient {
    client: Client,
    access_token: String,
    config: FunctionsConfig,
}

impl FunctionsConnectClient {
    /// Create a client for a signed-in user
    pub fn new(access_token: impl Into<String>, config: FunctionsConfig) -> Result<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(ElecMateError::Validation("Please log in to connect Stripe".to_string()));
        }
        if config.base_url.trim().is_empty() {
            return Err(ElecMateError::Validation("Functions URL is not configured".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ElecMateError::Connect(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token,
            config,
        })
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.config.base_url.trim_end_matches('/'), name)
    }

    async fn invoke<T: DeserializeOwned>(&self, name: &str, body: Value) -> Result<T> {
        let url = self.function_url(name);
        debug!("Invoking {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ElecMateError::Connect(format!("{} request failed: {}", name, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ElecMateError::Connect(format!("Failed to read {} response: {}", name, e)))?;

        if !status.is_success() {
            let message = extract_error_message(&text).unwrap_or_else(|| text.clone());
            error!("{} returned {}: {}", name, status, message);
            return Err(ElecMateError::Connect(format!("{} ({}): {}", name, status.as_u16(), message)));
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text)
            .map_err(|e| ElecMateError::Connect(format!("Unexpected {} response: {}", name, e)))
    }
}

/// Pull `error` or `message` out of a JSON error body
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[async_trait]
impl PaymentsConnect for FunctionsConnectClient {
    async fn status(&self) -> Result<ConnectStatus> {
        self.invoke(STATUS_FUNCTION, json!({})).await
    }

    async fn create_account(&self, business_name: &str, email: &str) -> Result<CreatedAccount> {
        if business_name.trim().is_empty() {
            return Err(ElecMateError::Validation("Business name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(ElecMateError::Validation(format!("'{}' is not an email address", email)));
        }
        self.invoke(CREATE_FUNCTION, json!({ "businessName": business_name.trim(), "email": email.trim() }))
            .await
    }

    async fn onboarding_link(&self, mode: LinkMode) -> Result<OnboardingLink> {
        self.invoke(LINK_FUNCTION, json!({ "mode": mode })).await
    }

    async fn disconnect(&self) -> Result<()> {
        let _: Value = self.invoke(DISCONNECT_FUNCTION, json!({})).await?;
        Ok(())
    }
}
