//! Personas and the offer explainer
//!
//! Explainers turn engine events into a line of dialogue. They run after
//! the engine has decided, and nothing they return flows back into it.

use crate::negotiation::NegotiationEvent;
use crate::report::format_currency;
use crate::types::{Party, Product};
use serde::{Deserialize, Serialize};

/// Tone and phrasing for one side of the table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub personality_type: String,
    pub traits: Vec<String>,
    pub negotiation_style: String,
    pub catchphrases: Vec<String>,
}

impl Persona {
    /// Cautious buyer who makes small incremental offers
    pub fn diplomatic_buyer() -> Self {
        Self {
            name: "Buyer".to_string(),
            personality_type: "diplomatic".to_string(),
            traits: vec![
                "empathetic".to_string(),
                "patient".to_string(),
                "data-driven".to_string(),
            ],
            negotiation_style: "Makes small incremental offers, very careful with money".to_string(),
            catchphrases: vec![
                "Let me think about that...".to_string(),
                "I'm sure we can find common ground.".to_string(),
                "That's pushing my budget.".to_string(),
            ],
        }
    }

    /// Confident seller who argues from value and margins
    pub fn data_driven_seller() -> Self {
        Self {
            name: "Seller".to_string(),
            personality_type: "data-driven".to_string(),
            traits: vec![
                "logical".to_string(),
                "strategic".to_string(),
                "analytical".to_string(),
            ],
            negotiation_style: "Makes calculated concessions, emphasizes value and profit margins"
                .to_string(),
            catchphrases: vec![
                "I can offer you a fair deal based on market value.".to_string(),
                "This price reflects the quality and effort involved.".to_string(),
                "Let's find a solution that works for both of us.".to_string(),
            ],
        }
    }

    /// Catchphrase for a round, cycling through the list
    pub fn catchphrase(&self, round: u32) -> &str {
        if self.catchphrases.is_empty() {
            return "";
        }
        let idx = (round as usize).saturating_sub(1) % self.catchphrases.len();
        &self.catchphrases[idx]
    }

    /// Multi-line description suitable for a prompt or a banner
    pub fn summary(&self) -> String {
        format!(
            "Personality Type: {}\nTraits: {}\nNegotiation Style: {}\nCatchphrases: {}",
            self.personality_type,
            self.traits.join(", "),
            self.negotiation_style,
            self.catchphrases.join(" | ")
        )
    }
}

/// Renders an engine event as a line of dialogue
pub trait Explainer {
    fn explain(&self, event: &NegotiationEvent, product: &Product) -> String;
}

/// Deterministic explainer built from catchphrases and fixed templates
#[derive(Clone, Debug)]
pub struct TemplateExplainer {
    buyer: Persona,
    seller: Persona,
}

impl TemplateExplainer {
    pub fn new(buyer: Persona, seller: Persona) -> Self {
        Self { buyer, seller }
    }

    fn persona(&self, party: Party) -> &Persona {
        match party {
            Party::Buyer => &self.buyer,
            Party::Seller => &self.seller,
        }
    }

    fn speaker(&self, party: Party) -> &str {
        &self.persona(party).name
    }
}

impl Default for TemplateExplainer {
    fn default() -> Self {
        Self::new(Persona::diplomatic_buyer(), Persona::data_driven_seller())
    }
}

impl Explainer for TemplateExplainer {
    fn explain(&self, event: &NegotiationEvent, product: &Product) -> String {
        match event {
            NegotiationEvent::Infeasible => format!(
                "{}> I'm afraid we are too far apart on {} to talk.",
                self.speaker(Party::Seller),
                product.name()
            ),
            NegotiationEvent::Offered(offer) => {
                let price = format_currency(offer.price);
                let line = match (offer.party, offer.round) {
                    (Party::Seller, 1) => {
                        if product.quality_grade().is_empty() {
                            format!("These are premium {}. I'm asking {}.", product.name(), price)
                        } else {
                            format!(
                                "These are premium {} grade {}. I'm asking {}.",
                                product.quality_grade(),
                                product.name(),
                                price
                            )
                        }
                    }
                    (Party::Buyer, 1) => format!(
                        "I'm interested, but {} is what I can offer. {}",
                        price,
                        self.buyer.catchphrase(1)
                    ),
                    (party, round) => format!(
                        "{} I can do {}.",
                        self.persona(party).catchphrase(round),
                        price
                    ),
                };
                format!("{}> {}", self.speaker(offer.party), line)
            }
            NegotiationEvent::Accepted { by, price, .. } => format!(
                "{}> Deal at {}.",
                self.speaker(*by),
                format_currency(*price)
            ),
            NegotiationEvent::Converged { price, .. } => format!(
                "{}> We're practically there, let's shake on {}.",
                self.speaker(Party::Seller),
                format_currency(*price)
            ),
            NegotiationEvent::Withdrew { party, .. } => format!(
                "{}> That's as far as I can go. I'll have to walk away.",
                self.speaker(*party)
            ),
            NegotiationEvent::TimedOut { round } => format!(
                "{}> We've gone {} rounds; let's leave it here.",
                self.speaker(Party::Seller),
                round
            ),
        }
    }
}
