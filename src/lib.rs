//! Bargain: bounded buyer/seller price negotiation
//!
//! A buyer and a seller take turns under their pricing policies until one
//! accepts, one walks away, or the round limit runs out.
//! - `negotiation`: policies, state and the round engine
//! - `persona`: dialogue for engine events, never consulted by the engine
//! - `scenario` / `report`: demo catalog, batch runs and summaries

pub mod cli;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod persona;
pub mod report;
pub mod scenario;
pub mod types;

// Re-export commonly used types
pub use config::NegotiationConfig;
pub use error::{NegotiationError, Result};
pub use negotiation::{
    BuyerPolicy, DealResult, Decision, MultiplierRule, NegotiationEngine, NegotiationEvent,
    NegotiationOutcome, NegotiationState, NegotiationStatus, OfferPolicy, SellerPolicy,
};
pub use types::{Offer, Party, Product, TranscriptDigest};
