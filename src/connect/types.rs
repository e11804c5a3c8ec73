//! Stripe Connect wire types.

use serde::{Deserialize, Serialize};

/// Lifecycle of the connected account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    #[default]
    NotConnected,
    /// Onboarding started but not finished
    Pending,
    Active,
    /// Stripe has limited charges or payouts
    Restricted,
}

impl AccountState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotConnected => "Not connected",
            Self::Pending => "Onboarding pending",
            Self::Active => "Stripe Connected",
            Self::Restricted => "Restricted",
        }
    }
}

/// Details of the connected account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccount {
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub business_name: Option<String>,
}

/// Response of the status function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectStatus {
    #[serde(default)]
    pub connected: bool,
    /// Whether the platform itself has Stripe keys configured
    #[serde(default)]
    pub stripe_configured: bool,
    #[serde(default)]
    pub status: AccountState,
    #[serde(default)]
    pub account: Option<ConnectAccount>,
}

impl ConnectStatus {
    /// Status shown before the first fetch completes, or when signed out
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connected and able to take card payments
    pub fn can_accept_payments(&self) -> bool {
        self.connected && self.account.as_ref().is_some_and(|a| a.charges_enabled)
    }
}

/// Response of account creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccount {
    pub onboarding_url: String,
}

/// Which Stripe-hosted page to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    #[default]
    Onboarding,
    Dashboard,
}

/// A single-use Stripe-hosted URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingLink {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_deserialize() {
        let status: ConnectStatus = serde_json::from_value(json!({
            "connected": true,
            "stripeConfigured": true,
            "status": "active",
            "account": {"chargesEnabled": true, "payoutsEnabled": false, "businessName": "Sparks Ltd"}
        }))
        .unwrap();
        assert_eq!(status.status, AccountState::Active);
        assert!(status.can_accept_payments());
        assert_eq!(status.account.unwrap().business_name.as_deref(), Some("Sparks Ltd"));
    }

    #[test]
    fn test_status_missing_fields_default() {
        let status: ConnectStatus = serde_json::from_value(json!({"connected": false})).unwrap();
        assert_eq!(status, ConnectStatus::disconnected());
        assert!(!status.can_accept_payments());
    }

    #[test]
    fn test_account_state_labels() {
        assert_eq!(AccountState::Active.label(), "Stripe Connected");
        let state: AccountState = serde_json::from_value(json!("not_connected")).unwrap();
        assert_eq!(state, AccountState::NotConnected);
    }

    #[test]
    fn test_created_account_camel_case() {
        let created: CreatedAccount =
            serde_json::from_value(json!({"onboardingUrl": "https://connect.stripe.com/setup/x"})).unwrap();
        assert!(created.onboarding_url.starts_with("https://"));
    }
}
