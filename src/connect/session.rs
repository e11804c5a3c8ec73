//! Connect status with stale-result protection.
//!
//! Each refresh takes a ticket. When the result arrives it is applied only if
//! no newer refresh has started and the board has not been closed, so a slow
//! response can never overwrite a newer one.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::{debug, warn};

use super::client::PaymentsConnect;
use super::types::ConnectStatus;
use crate::error::{ElecMateError, Result};
use crate::notice::Notice;

/// Identifies one in-flight refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// What happened to a completed refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// Superseded or closed; the result was dropped
    Discarded,
    /// Request failed; previous status kept
    Failed(Notice),
}

/// Latest known Stripe Connect status
#[derive(Debug)]
pub struct StatusBoard {
    status: Mutex<ConnectStatus>,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(ConnectStatus::disconnected()),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Current status snapshot
    pub fn status(&self) -> Result<ConnectStatus> {
        self.status
            .lock()
            .map(|s| s.clone())
            .map_err(|e| ElecMateError::InvalidState(e.to_string()))
    }

    /// Start a refresh; any earlier ticket becomes stale.
    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stop accepting results, e.g. when the view is torn down.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: RefreshTicket) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply a finished refresh if its ticket is still current.
    pub fn complete(&self, ticket: RefreshTicket, result: Result<ConnectStatus>) -> RefreshOutcome {
        if !self.is_current(ticket) {
            debug!("Discarding stale connect status (ticket {})", ticket.0);
            return RefreshOutcome::Discarded;
        }
        match result {
            Ok(status) => match self.status.lock() {
                Ok(mut current) => {
                    *current = status;
                    RefreshOutcome::Applied
                }
                Err(e) => RefreshOutcome::Failed(Notice::error(format!("Status unavailable: {}", e))),
            },
            Err(e) => {
                warn!("Error checking Stripe status: {}", e);
                RefreshOutcome::Failed(Notice::error(format!("Could not check Stripe status: {}", e)))
            }
        }
    }

    /// Fetch and apply the status in one step.
    pub async fn refresh(&self, client: &dyn PaymentsConnect) -> RefreshOutcome {
        let ticket = self.begin();
        let result = client.status().await;
        self.complete(ticket, result)
    }
}
