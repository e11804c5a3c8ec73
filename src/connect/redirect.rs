//! Return-URL handling after Stripe onboarding.
//!
//! Stripe sends the user back with `stripe=success` or `stripe=refresh`. The
//! parameter is read once and removed so a reload does not replay it.

use log::warn;
use reqwest::Url;

use crate::error::{ElecMateError, Result};
use crate::notice::Notice;

const STRIPE_PARAM: &str = "stripe";

/// Outcome signalled by the return URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Onboarding finished
    Success,
    /// Link expired; a new one must be requested
    Refresh,
}

impl RedirectOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            Self::Success => Notice::success("Stripe account connected"),
            Self::Refresh => Notice::warning("Stripe onboarding link expired, please continue setup again"),
        }
    }
}

/// A return URL with the Stripe parameter consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRedirect {
    pub outcome: Option<RedirectOutcome>,
    /// URL to replace the current one with
    pub cleaned_url: String,
}

/// Read and strip the `stripe` query parameter.
///
/// Unrecognised values are stripped too, with no outcome.
pub fn consume_redirect(url: &str) -> Result<ConsumedRedirect> {
    let mut parsed = Url::parse(url).map_err(|e| ElecMateError::Validation(format!("Invalid URL '{}': {}", url, e)))?;

    let mut outcome = None;
    let mut kept = Vec::new();
    for (key, value) in parsed.query_pairs() {
        if key == STRIPE_PARAM {
            outcome = match value.as_ref() {
                "success" => Some(RedirectOutcome::Success),
                "refresh" => Some(RedirectOutcome::Refresh),
                other => {
                    warn!("Ignoring unknown stripe redirect value '{}'", other);
                    None
                }
            };
        } else {
            kept.push((key.into_owned(), value.into_owned()));
        }
    }

    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(ConsumedRedirect {
        outcome,
        cleaned_url: parsed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_consumed() {
        let consumed = consume_redirect("https://app.example.com/settings?tab=business&stripe=success").unwrap();
        assert_eq!(consumed.outcome, Some(RedirectOutcome::Success));
        assert_eq!(consumed.cleaned_url, "https://app.example.com/settings?tab=business");
    }

    #[test]
    fn test_refresh_only_param_removes_query() {
        let consumed = consume_redirect("https://app.example.com/settings?stripe=refresh").unwrap();
        assert_eq!(consumed.outcome, Some(RedirectOutcome::Refresh));
        assert_eq!(consumed.cleaned_url, "https://app.example.com/settings");
    }

    #[test]
    fn test_consuming_twice_is_noop() {
        let first = consume_redirect("https://app.example.com/settings?stripe=success").unwrap();
        let second = consume_redirect(&first.cleaned_url).unwrap();
        assert_eq!(second.outcome, None);
        assert_eq!(second.cleaned_url, first.cleaned_url);
    }

    #[test]
    fn test_unknown_value_stripped() {
        let consumed = consume_redirect("https://app.example.com/settings?stripe=bogus&x=1").unwrap();
        assert_eq!(consumed.outcome, None);
        assert_eq!(consumed.cleaned_url, "https://app.example.com/settings?x=1");
    }

    #[test]
    fn test_fragment_preserved() {
        let consumed = consume_redirect("https://app.example.com/settings?stripe=success#payments").unwrap();
        assert_eq!(consumed.cleaned_url, "https://app.example.com/settings#payments");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(consume_redirect("not a url"), Err(ElecMateError::Validation(_))));
    }

    #[test]
    fn test_outcome_notices() {
        assert!(!RedirectOutcome::Success.notice().is_error());
        assert!(RedirectOutcome::Refresh.notice().message.contains("expired"));
    }
}
