//! Mutable state of one negotiation, owned by the engine

use crate::error::{NegotiationError, Result};
use crate::types::{Offer, Party};

use super::types::NegotiationStatus;

/// Offer history, round counter and status of a run
#[derive(Clone, Debug)]
pub struct NegotiationState {
    history: Vec<Offer>,
    round: u32,
    status: NegotiationStatus,
    final_price: Option<f64>,
}

impl NegotiationState {
    /// Fresh state at round 0
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            round: 0,
            status: NegotiationStatus::InProgress,
            final_price: None,
        }
    }

    /// All offers, oldest first
    pub fn history(&self) -> &[Offer] {
        &self.history
    }

    /// Current round, 0 before the opening offer
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn status(&self) -> NegotiationStatus {
        self.status
    }

    /// Agreed price, set only when the status is `Deal`
    pub fn final_price(&self) -> Option<f64> {
        self.final_price
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Most recent offer by anyone
    pub fn last_offer(&self) -> Option<&Offer> {
        self.history.last()
    }

    /// Most recent offer made by `party`
    pub fn last_offer_by(&self, party: Party) -> Option<&Offer> {
        self.history.iter().rev().find(|o| o.party == party)
    }

    /// The offer `party` made before its most recent one
    pub fn previous_offer_by(&self, party: Party) -> Option<&Offer> {
        self.history.iter().rev().filter(|o| o.party == party).nth(1)
    }

    /// Start the next full round
    pub(crate) fn begin_round(&mut self) -> Result<u32> {
        self.ensure_active("Cannot start a round in terminal state")?;
        self.round = self.round.checked_add(1).ok_or_else(|| {
            NegotiationError::InvalidStateTransition("Round counter exhausted".to_string())
        })?;
        Ok(self.round)
    }

    /// Append an offer to the history
    pub(crate) fn record(&mut self, offer: Offer) -> Result<()> {
        self.ensure_active("Cannot add offer to terminal state")?;
        self.history.push(offer);
        Ok(())
    }

    /// Close with a deal at `price`
    pub(crate) fn close_deal(&mut self, price: f64) -> Result<()> {
        self.ensure_active("Negotiation already finished")?;
        self.status = NegotiationStatus::Deal;
        self.final_price = Some(price);
        Ok(())
    }

    /// End without a deal
    pub(crate) fn finish(&mut self, status: NegotiationStatus) -> Result<()> {
        self.ensure_active("Negotiation already finished")?;
        if matches!(status, NegotiationStatus::InProgress | NegotiationStatus::Deal) {
            return Err(NegotiationError::InvalidStateTransition(format!(
                "{:?} is not a no-deal outcome",
                status
            )));
        }
        self.status = status;
        Ok(())
    }

    fn ensure_active(&self, message: &str) -> Result<()> {
        if self.is_terminal() {
            return Err(NegotiationError::InvalidStateTransition(message.to_string()));
        }
        Ok(())
    }
}

impl Default for NegotiationState {
    fn default() -> Self {
        Self::new()
    }
}
