//! Negotiation module: policies, state and the round engine

pub mod engine;
pub mod policy;
pub mod session;
pub mod types;

pub use engine::NegotiationEngine;
pub use policy::{BuyerPolicy, MultiplierRule, OfferPolicy, SellerPolicy};
pub use session::NegotiationState;
pub use types::{DealResult, Decision, NegotiationEvent, NegotiationOutcome, NegotiationStatus};
