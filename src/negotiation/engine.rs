//! Negotiation engine drives one buyer/seller run to a terminal state

use crate::config::NegotiationConfig;
use crate::error::{NegotiationError, Result};
use crate::types::{Offer, Party, Product};

use super::policy::{BuyerPolicy, OfferPolicy, SellerPolicy};
use super::session::NegotiationState;
use super::types::{DealResult, Decision, NegotiationEvent, NegotiationOutcome, NegotiationStatus};

/// Alternates the two policies over a private [`NegotiationState`]
pub struct NegotiationEngine {
    product: Product,
    config: NegotiationConfig,
    buyer: Box<dyn OfferPolicy>,
    seller: Box<dyn OfferPolicy>,
    state: NegotiationState,
    next_mover: Party,
    epsilon: f64,
}

impl NegotiationEngine {
    /// Create an engine with caller-supplied policies
    pub fn new(
        product: Product,
        config: NegotiationConfig,
        buyer: Box<dyn OfferPolicy>,
        seller: Box<dyn OfferPolicy>,
    ) -> Result<Self> {
        config.validate()?;

        if buyer.party() != Party::Buyer || seller.party() != Party::Seller {
            return Err(NegotiationError::InvalidConfig(
                "policies must play buyer and seller respectively".to_string(),
            ));
        }

        let epsilon = config.epsilon_for(product.base_price());

        Ok(Self {
            product,
            config,
            buyer,
            seller,
            state: NegotiationState::new(),
            next_mover: Party::Seller,
            epsilon,
        })
    }

    /// Create an engine with the stock buyer and seller policies
    pub fn with_default_policies(product: Product, config: NegotiationConfig) -> Result<Self> {
        let buyer = Box::new(BuyerPolicy::from_config(&config));
        let seller = Box::new(SellerPolicy::from_config(&config));
        Self::new(product, config, buyer, seller)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// Party whose turn is next
    pub fn next_mover(&self) -> Party {
        self.next_mover
    }

    /// Play one half-round and report what happened
    pub fn step(&mut self) -> Result<Vec<NegotiationEvent>> {
        if self.state.is_terminal() {
            return Err(NegotiationError::InvalidStateTransition(
                "Negotiation already finished".to_string(),
            ));
        }

        if self.state.round() == 0 && !self.product.is_feasible() {
            tracing::warn!(
                "Budget {} is below seller floor {}, no deal possible",
                self.product.budget(),
                self.product.min_price()
            );
            self.state.finish(NegotiationStatus::NoDeal)?;
            return Ok(vec![NegotiationEvent::Infeasible]);
        }

        let mover = self.next_mover;
        if mover == Party::Seller {
            self.state.begin_round()?;
        }
        let round = self.state.round();

        let decision = self.policy(mover).next_offer(&self.state, &self.product);
        tracing::debug!("Round {}: {} decided {:?}", round, mover, decision);

        let mut events = Vec::with_capacity(2);

        match decision {
            Decision::Accept => {
                let pending = self
                    .state
                    .last_offer_by(mover.counterpart())
                    .map(|o| o.price)
                    .ok_or_else(|| {
                        NegotiationError::InvalidStateTransition(format!(
                            "{} accepted before any counteroffer",
                            mover
                        ))
                    })?;
                self.check_acceptance(mover, pending)?;
                self.state.close_deal(pending)?;
                tracing::info!("{} accepted {:.2} in round {}", mover, pending, round);
                events.push(NegotiationEvent::Accepted {
                    by: mover,
                    price: pending,
                    round,
                });
            }

            Decision::Withdraw => {
                self.state.finish(NegotiationStatus::NoDeal)?;
                tracing::info!("{} withdrew in round {}, no deal", mover, round);
                events.push(NegotiationEvent::Withdrew { party: mover, round });
            }

            Decision::Counter(price) => {
                self.check_bound(mover, price)?;
                if self.config.detect_stalls {
                    self.check_progress(mover, price)?;
                }

                let offer = Offer {
                    price,
                    round,
                    party: mover,
                };
                self.state.record(offer)?;
                events.push(NegotiationEvent::Offered(offer));

                let receiver = mover.counterpart();
                if self.policy(receiver).accepts(&offer, &self.state, &self.product) {
                    self.check_acceptance(receiver, price)?;
                    self.state.close_deal(price)?;
                    tracing::info!("{} accepted {:.2} in round {}", receiver, price, round);
                    events.push(NegotiationEvent::Accepted {
                        by: receiver,
                        price,
                        round,
                    });
                } else if round > self.config.max_rounds {
                    self.state.finish(NegotiationStatus::TimedOut)?;
                    tracing::info!("Timed out after {} rounds", round);
                    events.push(NegotiationEvent::TimedOut { round });
                } else if let Some(price) = self.converged_price() {
                    self.state.close_deal(price)?;
                    tracing::info!("Offers converged at {:.2} in round {}", price, round);
                    events.push(NegotiationEvent::Converged { price, round });
                } else {
                    self.next_mover = receiver;
                }
            }
        }

        Ok(events)
    }

    /// Step until a terminal state and summarize it
    pub fn run(&mut self) -> Result<NegotiationOutcome> {
        tracing::debug!(
            "Negotiating {} (market {:.2}, floor {:.2}, budget {:.2})",
            self.product.name(),
            self.product.base_price(),
            self.product.min_price(),
            self.product.budget()
        );

        while !self.state.is_terminal() {
            self.step()?;
        }

        self.outcome()
    }

    /// Summary of the finished run; fails while still in progress
    pub fn outcome(&self) -> Result<NegotiationOutcome> {
        Ok(NegotiationOutcome {
            result: DealResult::from_state(&self.state, &self.product)?,
            history: self.state.history().to_vec(),
        })
    }

    fn policy(&self, party: Party) -> &dyn OfferPolicy {
        match party {
            Party::Buyer => self.buyer.as_ref(),
            Party::Seller => self.seller.as_ref(),
        }
    }

    /// Offers must stay within the offering party's own bound
    fn check_bound(&self, party: Party, price: f64) -> Result<()> {
        if !price.is_finite() || price <= 0.0 {
            return Err(NegotiationError::PolicyViolation {
                party,
                price,
                bound: 0.0,
            });
        }

        match party {
            Party::Buyer if price > self.product.budget() => Err(NegotiationError::PolicyViolation {
                party,
                price,
                bound: self.product.budget(),
            }),
            Party::Seller if price < self.product.min_price() => {
                Err(NegotiationError::PolicyViolation {
                    party,
                    price,
                    bound: self.product.min_price(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Accepting a price is held to the same bound as offering it
    fn check_acceptance(&self, acceptor: Party, price: f64) -> Result<()> {
        self.check_bound(acceptor, price)
    }

    fn check_progress(&self, mover: Party, price: f64) -> Result<()> {
        let repeated = self
            .state
            .last_offer_by(mover)
            .is_some_and(|own| own.price == price);

        let other = mover.counterpart();
        let counterpart_idle = match (
            self.state.last_offer_by(other),
            self.state.previous_offer_by(other),
        ) {
            (Some(last), Some(prev)) => last.price == prev.price,
            _ => false,
        };

        if repeated && counterpart_idle {
            tracing::warn!("{} is stuck at {:.2}", mover, price);
            return Err(NegotiationError::NoProgress { party: mover, price });
        }
        Ok(())
    }

    /// A price both bounds admit once the latest offers sit within epsilon
    fn converged_price(&self) -> Option<f64> {
        let ask = self.state.last_offer_by(Party::Seller)?.price;
        let bid = self.state.last_offer_by(Party::Buyer)?.price;

        if (ask - bid).abs() > self.epsilon {
            return None;
        }

        let price = ask.min(self.product.budget());
        (price >= self.product.min_price()).then_some(price)
    }
}
