//! Pricing policies for both sides of the table

use crate::config::NegotiationConfig;
use crate::error::{NegotiationError, Result};
use crate::types::{Offer, Party, Product};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::session::NegotiationState;
use super::types::Decision;

/// Seller opens at this multiple of the market price
pub const SELLER_OPENING_MARKUP: f64 = 1.5;
/// Buyer opens at this fraction of the market price
pub const BUYER_OPENING_FRACTION: f64 = 0.6;
/// Buyer raises its own last offer by this factor each turn
pub const BUYER_STEP: f64 = 1.1;
/// Bounds of the seller's counteroffer multiplier
pub const MIN_MULTIPLIER: f64 = 1.05;
pub const MAX_MULTIPLIER: f64 = 1.15;

/// Strategy of one party.
///
/// Implementations read the state and return a decision; only the engine
/// mutates the state.
pub trait OfferPolicy: Send {
    /// Which side this policy plays
    fn party(&self) -> Party;

    /// Decide the next move on this party's turn
    fn next_offer(&self, state: &NegotiationState, product: &Product) -> Decision;

    /// Whether to take the counterpart's freshly made offer without countering
    fn accepts(&self, offer: &Offer, state: &NegotiationState, product: &Product) -> bool;
}

/// How the seller picks its counteroffer multiplier within
/// [`MIN_MULTIPLIER`, `MAX_MULTIPLIER`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiplierRule {
    /// Centre of the range
    Midpoint,
    /// A constant, clamped into the range
    Fixed(f64),
    /// `early` before `late_round`, `late` from then on
    RoundDependent { late_round: u32, early: f64, late: f64 },
    /// Reproducible pseudo-random draw per round
    Seeded(u64),
}

impl MultiplierRule {
    /// Wide markups early, tight ones once the clock runs down
    pub fn closing_pressure() -> Self {
        MultiplierRule::RoundDependent {
            late_round: 9,
            early: MAX_MULTIPLIER,
            late: MIN_MULTIPLIER,
        }
    }

    /// Multiplier to apply in `round`
    pub fn multiplier(&self, round: u32) -> f64 {
        let raw = match self {
            MultiplierRule::Midpoint => (MIN_MULTIPLIER + MAX_MULTIPLIER) / 2.0,
            MultiplierRule::Fixed(value) => *value,
            MultiplierRule::RoundDependent {
                late_round,
                early,
                late,
            } => {
                if round >= *late_round {
                    *late
                } else {
                    *early
                }
            }
            MultiplierRule::Seeded(seed) => {
                let mut rng =
                    StdRng::seed_from_u64(seed ^ u64::from(round).wrapping_mul(0x9E37_79B9_7F4A_7C15));
                rng.gen_range(MIN_MULTIPLIER..=MAX_MULTIPLIER)
            }
        };
        raw.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
    }

    /// Reject values outside the strategic range
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&v);
        let ok = match self {
            MultiplierRule::Midpoint | MultiplierRule::Seeded(_) => true,
            MultiplierRule::Fixed(value) => in_range(*value),
            MultiplierRule::RoundDependent { early, late, .. } => in_range(*early) && in_range(*late),
        };

        if !ok {
            return Err(NegotiationError::InvalidConfig(format!(
                "multiplier {:?} outside [{}, {}]",
                self, MIN_MULTIPLIER, MAX_MULTIPLIER
            )));
        }
        Ok(())
    }
}

impl Default for MultiplierRule {
    fn default() -> Self {
        MultiplierRule::Midpoint
    }
}

/// Seller: opens high, concedes toward the buyer's offer, never below its floor
#[derive(Clone, Debug)]
pub struct SellerPolicy {
    profit_margin: f64,
    multiplier: MultiplierRule,
}

impl SellerPolicy {
    pub fn new(profit_margin: f64, multiplier: MultiplierRule) -> Self {
        Self {
            profit_margin,
            multiplier,
        }
    }

    pub fn from_config(config: &NegotiationConfig) -> Self {
        Self::new(config.seller_profit_margin, config.multiplier.clone())
    }

    fn acceptable(&self, price: f64, state: &NegotiationState, product: &Product) -> bool {
        if price >= product.min_price() * (1.0 + self.profit_margin) {
            return true;
        }
        // A bid that meets our own standing ask is taken
        state
            .last_offer_by(Party::Seller)
            .is_some_and(|ask| price >= ask.price && price >= product.min_price())
    }
}

impl OfferPolicy for SellerPolicy {
    fn party(&self) -> Party {
        Party::Seller
    }

    fn next_offer(&self, state: &NegotiationState, product: &Product) -> Decision {
        let bid = match state.last_offer_by(Party::Buyer) {
            Some(bid) => bid.price,
            None => return Decision::Counter(product.base_price() * SELLER_OPENING_MARKUP),
        };

        if self.acceptable(bid, state, product) {
            return Decision::Accept;
        }

        let own = state.last_offer_by(Party::Seller).map(|o| o.price);

        if let Some(ask) = own {
            let buyer_moved = state
                .previous_offer_by(Party::Buyer)
                .map_or(true, |prev| bid > prev.price);
            if ask <= product.min_price() && !buyer_moved {
                return Decision::Withdraw;
            }
        }

        let mut counter = (bid * self.multiplier.multiplier(state.round())).max(product.min_price());
        if let Some(ask) = own {
            counter = counter.min(ask);
        }
        Decision::Counter(counter)
    }

    fn accepts(&self, offer: &Offer, state: &NegotiationState, product: &Product) -> bool {
        self.acceptable(offer.price, state, product)
    }
}

/// Buyer: opens low, raises in small steps, never above its budget
#[derive(Clone, Debug)]
pub struct BuyerPolicy {
    close_band: f64,
}

impl BuyerPolicy {
    pub fn new(close_band: f64) -> Self {
        Self { close_band }
    }

    pub fn from_config(config: &NegotiationConfig) -> Self {
        Self::new(config.buyer_close_band)
    }

    fn step_from(own: f64, product: &Product) -> f64 {
        (own * BUYER_STEP).min(product.budget())
    }

    fn acceptable(&self, ask: f64, state: &NegotiationState, product: &Product) -> bool {
        if ask > product.budget() {
            return false;
        }
        // Always counter the opening ask before considering it
        let own = match state.last_offer_by(Party::Buyer) {
            Some(own) => own.price,
            None => return false,
        };
        ask <= own * (1.0 + self.close_band)
    }
}

impl OfferPolicy for BuyerPolicy {
    fn party(&self) -> Party {
        Party::Buyer
    }

    fn next_offer(&self, state: &NegotiationState, product: &Product) -> Decision {
        let own = match state.last_offer_by(Party::Buyer) {
            Some(own) => own.price,
            None => {
                let opening = (product.base_price() * BUYER_OPENING_FRACTION).min(product.budget());
                return Decision::Counter(opening);
            }
        };

        let ask = state.last_offer_by(Party::Seller).map(|ask| ask.price);
        if let Some(ask) = ask {
            if self.acceptable(ask, state, product) {
                return Decision::Accept;
            }
        }

        if own >= product.budget() {
            return Decision::Withdraw;
        }

        // Never bid past the standing ask
        let counter = Self::step_from(own, product);
        match ask {
            Some(ask) => Decision::Counter(counter.min(ask).max(own)),
            None => Decision::Counter(counter),
        }
    }

    fn accepts(&self, offer: &Offer, state: &NegotiationState, product: &Product) -> bool {
        self.acceptable(offer.price, state, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new("test", 1000.0, 700.0, 900.0).unwrap()
    }

    fn state_with(offers: &[(f64, Party)]) -> NegotiationState {
        let mut state = NegotiationState::new();
        for (price, party) in offers {
            if *party == Party::Seller {
                state.begin_round().unwrap();
            }
            state
                .record(Offer {
                    price: *price,
                    round: state.round(),
                    party: *party,
                })
                .unwrap();
        }
        state
    }

    #[test]
    fn test_seller_opening() {
        let seller = SellerPolicy::new(0.1, MultiplierRule::Midpoint);
        let state = NegotiationState::new();
        assert_eq!(seller.next_offer(&state, &product()), Decision::Counter(1500.0));
    }

    #[test]
    fn test_buyer_opening_capped_by_budget() {
        let buyer = BuyerPolicy::new(0.1);
        let state = state_with(&[(1500.0, Party::Seller)]);
        assert_eq!(buyer.next_offer(&state, &product()), Decision::Counter(600.0));

        let poor = Product::new("test", 1000.0, 400.0, 500.0).unwrap();
        assert_eq!(buyer.next_offer(&state, &poor), Decision::Counter(500.0));
    }

    #[test]
    fn test_seller_counter_respects_floor_and_own_ask() {
        let seller = SellerPolicy::new(0.1, MultiplierRule::Midpoint);
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer)]);

        // 600 * 1.1 = 660 is below the floor
        assert_eq!(seller.next_offer(&state, &product()), Decision::Counter(700.0));

        let state = state_with(&[(1500.0, Party::Seller), (1450.0, Party::Buyer)]);
        let wide = Product::new("test", 1000.0, 700.0, 2000.0).unwrap();
        // Well above the profit threshold
        assert_eq!(seller.next_offer(&state, &wide), Decision::Accept);
    }

    #[test]
    fn test_seller_accepts_profitable_offer() {
        let seller = SellerPolicy::new(0.1, MultiplierRule::Midpoint);
        let state = state_with(&[(1500.0, Party::Seller)]);
        let offer = |price| Offer {
            price,
            round: 1,
            party: Party::Buyer,
        };

        assert!(seller.accepts(&offer(771.0), &state, &product()));
        assert!(!seller.accepts(&offer(760.0), &state, &product()));
    }

    #[test]
    fn test_seller_accepts_bid_meeting_own_ask() {
        let seller = SellerPolicy::new(0.1, MultiplierRule::Midpoint);
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer), (720.0, Party::Seller)]);
        let offer = |price| Offer {
            price,
            round: 2,
            party: Party::Buyer,
        };

        // below the margin, but at or above the standing ask
        assert!(seller.accepts(&offer(720.0), &state, &product()));
        assert!(!seller.accepts(&offer(715.0), &state, &product()));
    }

    #[test]
    fn test_seller_withdraws_at_floor_against_stalled_buyer() {
        let seller = SellerPolicy::new(0.1, MultiplierRule::Midpoint);
        let state = state_with(&[
            (1500.0, Party::Seller),
            (650.0, Party::Buyer),
            (700.0, Party::Seller),
            (650.0, Party::Buyer),
        ]);
        assert_eq!(seller.next_offer(&state, &product()), Decision::Withdraw);
    }

    #[test]
    fn test_buyer_counter_steps_and_caps() {
        let buyer = BuyerPolicy::new(0.1);
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer), (1400.0, Party::Seller)]);
        match buyer.next_offer(&state, &product()) {
            Decision::Counter(price) => assert!((price - 660.0).abs() < 1e-9),
            other => panic!("unexpected decision {:?}", other),
        }

        let state = state_with(&[(1500.0, Party::Seller), (850.0, Party::Buyer), (1400.0, Party::Seller)]);
        assert_eq!(buyer.next_offer(&state, &product()), Decision::Counter(900.0));
    }

    #[test]
    fn test_buyer_withdraws_at_budget() {
        let buyer = BuyerPolicy::new(0.1);
        let state = state_with(&[(1500.0, Party::Seller), (900.0, Party::Buyer), (950.0, Party::Seller)]);
        assert_eq!(buyer.next_offer(&state, &product()), Decision::Withdraw);
    }

    #[test]
    fn test_buyer_acceptance_band() {
        let buyer = BuyerPolicy::new(0.1);
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer)]);
        let ask = |price| Offer {
            price,
            round: 2,
            party: Party::Seller,
        };

        assert!(buyer.accepts(&ask(650.0), &state, &product()));
        assert!(!buyer.accepts(&ask(700.0), &state, &product()));

        // Never above budget, however close
        let state = state_with(&[(1500.0, Party::Seller), (890.0, Party::Buyer)]);
        assert!(!buyer.accepts(&ask(905.0), &state, &product()));
    }

    #[test]
    fn test_buyer_band_is_the_only_acceptance_limit() {
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer)]);
        let ask = |price| Offer {
            price,
            round: 2,
            party: Party::Seller,
        };

        let strict = BuyerPolicy::new(0.0);
        assert!(strict.accepts(&ask(600.0), &state, &product()));
        assert!(!strict.accepts(&ask(650.0), &state, &product()));

        let narrow = BuyerPolicy::new(0.05);
        assert!(narrow.accepts(&ask(625.0), &state, &product()));
        assert!(!narrow.accepts(&ask(650.0), &state, &product()));
    }

    #[test]
    fn test_buyer_counter_never_passes_ask() {
        let buyer = BuyerPolicy::new(0.0);
        let state = state_with(&[(1500.0, Party::Seller), (600.0, Party::Buyer), (640.0, Party::Seller)]);
        assert_eq!(buyer.next_offer(&state, &product()), Decision::Counter(640.0));
    }

    #[test]
    fn test_buyer_never_accepts_opening() {
        let buyer = BuyerPolicy::new(1.0);
        let rich = Product::new("test", 1000.0, 700.0, 5000.0).unwrap();
        let state = state_with(&[(1500.0, Party::Seller)]);
        let opening = *state.last_offer().unwrap();
        assert!(!buyer.accepts(&opening, &state, &rich));
    }

    #[test]
    fn test_multiplier_rules_stay_in_range() {
        assert!((MultiplierRule::Midpoint.multiplier(1) - 1.10).abs() < 1e-9);
        assert_eq!(MultiplierRule::Fixed(2.0).multiplier(1), MAX_MULTIPLIER);

        let pressure = MultiplierRule::closing_pressure();
        assert_eq!(pressure.multiplier(2), MAX_MULTIPLIER);
        assert_eq!(pressure.multiplier(9), MIN_MULTIPLIER);

        for round in 1..50 {
            let m = MultiplierRule::Seeded(42).multiplier(round);
            assert!((MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&m));
        }
    }

    #[test]
    fn test_seeded_multiplier_is_reproducible() {
        let rule = MultiplierRule::Seeded(1234);
        assert_eq!(rule.multiplier(3), rule.multiplier(3));
    }

    #[test]
    fn test_multiplier_validation() {
        assert!(MultiplierRule::Fixed(1.08).validate().is_ok());
        assert!(MultiplierRule::Fixed(1.30).validate().is_err());
        assert!(MultiplierRule::RoundDependent {
            late_round: 3,
            early: 1.2,
            late: 1.05
        }
        .validate()
        .is_err());
    }
}
