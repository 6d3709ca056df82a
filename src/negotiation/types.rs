//! Negotiation types and outcomes

use crate::error::{NegotiationError, Result};
use crate::types::{Offer, Party, Product, TranscriptDigest};
use serde::{Deserialize, Serialize};

use super::session::NegotiationState;

/// Lifecycle of a single negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationStatus {
    InProgress,
    Deal,
    NoDeal,
    TimedOut,
}

impl NegotiationStatus {
    /// Check if negotiation is in a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NegotiationStatus::InProgress)
    }
}

/// What a policy wants to do on its turn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    /// Put a new price on the table
    Counter(f64),
    /// Take the counterpart's latest offer as is
    Accept,
    /// No further concession is available
    Withdraw,
}

/// Something that happened during one half-round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NegotiationEvent {
    /// Budget sits below the seller's floor; no offers were exchanged
    Infeasible,
    Offered(Offer),
    Accepted { by: Party, price: f64, round: u32 },
    Converged { price: f64, round: u32 },
    Withdrew { party: Party, round: u32 },
    TimedOut { round: u32 },
}

/// Final summary of a finished negotiation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DealResult {
    pub status: NegotiationStatus,
    pub closed: bool,
    pub final_price: Option<f64>,
    pub rounds_used: u32,
    /// Base price minus final price
    pub savings: f64,
    pub below_market_pct: f64,
    /// Budget minus final price
    pub budget_savings: f64,
    pub budget_savings_pct: f64,
}

impl DealResult {
    /// Derive the summary from a terminal state.
    ///
    /// Pure: calling it again on the same state yields an identical result.
    pub fn from_state(state: &NegotiationState, product: &Product) -> Result<Self> {
        if !state.is_terminal() {
            return Err(NegotiationError::InvalidStateTransition(
                "Cannot summarize a negotiation still in progress".to_string(),
            ));
        }

        let final_price = match state.status() {
            NegotiationStatus::Deal => state.final_price(),
            _ => None,
        };

        let result = match final_price {
            Some(price) => {
                let savings = product.base_price() - price;
                let budget_savings = product.budget() - price;
                Self {
                    status: state.status(),
                    closed: true,
                    final_price: Some(price),
                    rounds_used: state.round(),
                    savings,
                    below_market_pct: savings / product.base_price() * 100.0,
                    budget_savings,
                    budget_savings_pct: budget_savings / product.budget() * 100.0,
                }
            }
            None => Self {
                status: state.status(),
                closed: false,
                final_price: None,
                rounds_used: state.round(),
                savings: 0.0,
                below_market_pct: 0.0,
                budget_savings: 0.0,
                budget_savings_pct: 0.0,
            },
        };

        Ok(result)
    }
}

/// Result plus the full offer history, for audit and reporting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    pub result: DealResult,
    pub history: Vec<Offer>,
}

impl NegotiationOutcome {
    pub fn digest(&self) -> TranscriptDigest {
        TranscriptDigest::from_history(&self.history)
    }
}
