//! Stripe Connect for taking card payments on invoices.
//!
//! The heavy lifting happens in the backend and on Stripe-hosted pages; this
//! module wraps the calls, tracks the latest status and consumes the
//! onboarding return parameter.

mod client;
mod redirect;
mod session;
mod types;

pub use client::{FunctionsConfig, FunctionsConnectClient, PaymentsConnect};
pub use redirect::{ConsumedRedirect, RedirectOutcome, consume_redirect};
pub use session::{RefreshOutcome, RefreshTicket, StatusBoard};
pub use types::{AccountState, ConnectAccount, ConnectStatus, CreatedAccount, LinkMode, OnboardingLink};
