//! Core types used throughout bargain

use crate::error::{NegotiationError, Result};
use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Side of the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    Buyer,
    Seller,
}

impl Party {
    /// The other side of the table
    pub fn counterpart(self) -> Self {
        match self {
            Party::Buyer => Party::Seller,
            Party::Seller => Party::Buyer,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Buyer => write!(f, "Buyer"),
            Party::Seller => write!(f, "Seller"),
        }
    }
}

/// Market facts for the single item under negotiation.
///
/// Prices are validated once in [`Product::new`]; the descriptive fields set
/// through the `with_*` builders carry no numeric meaning.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    name: String,
    category: String,
    quantity: u32,
    quality_grade: String,
    origin: String,
    attributes: BTreeMap<String, serde_json::Value>,
    base_price: f64,
    min_price: f64,
    budget: f64,
}

impl Product {
    /// Create a product, rejecting non-positive prices and a floor above market
    pub fn new(name: impl Into<String>, base_price: f64, min_price: f64, budget: f64) -> Result<Self> {
        check_positive("base price", base_price)?;
        check_positive("seller minimum price", min_price)?;
        check_positive("buyer budget", budget)?;

        if min_price > base_price {
            return Err(NegotiationError::InvalidProduct(format!(
                "seller minimum price {} exceeds base price {}",
                min_price, base_price
            )));
        }

        Ok(Self {
            name: name.into(),
            category: String::new(),
            quantity: 1,
            quality_grade: String::new(),
            origin: String::new(),
            attributes: BTreeMap::new(),
            base_price,
            min_price,
            budget,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_quality_grade(mut self, grade: impl Into<String>) -> Self {
        self.quality_grade = grade.into();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn quality_grade(&self) -> &str {
        &self.quality_grade
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    /// Reference market price
    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Seller's floor
    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    /// Buyer's ceiling
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Whether any price satisfies both the floor and the ceiling
    pub fn is_feasible(&self) -> bool {
        self.budget >= self.min_price
    }
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(NegotiationError::InvalidProduct(format!(
            "{} must be a positive number, got {}",
            field, value
        )));
    }
    Ok(())
}

/// A single priced move by one party
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: f64,
    pub round: u32,
    pub party: Party,
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} {} @ {:.2}", self.round, self.party, self.price)
    }
}

/// Blake2b 256-bit digest of an offer history
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranscriptDigest(pub [u8; 32]);

impl TranscriptDigest {
    /// Digest offers in order; identical histories always hash the same
    pub fn from_history(history: &[Offer]) -> Self {
        let mut hasher = Blake2b512::new();
        for offer in history {
            hasher.update(offer.round.to_le_bytes());
            hasher.update(match offer.party {
                Party::Buyer => [0u8],
                Party::Seller => [1u8],
            });
            hasher.update(offer.price.to_bits().to_le_bytes());
        }
        let result = hasher.finalize();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result[..32]);
        TranscriptDigest(digest)
    }

    /// Get digest as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from hex string
    pub fn from_hex(hex_str: &str) -> std::result::Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes);
        Ok(TranscriptDigest(digest))
    }
}

impl fmt::Display for TranscriptDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new("Alphonso Mangoes", 1000.0, 700.0, 900.0)
            .unwrap()
            .with_quantity(100)
            .with_origin("Ratnagiri");

        assert_eq!(product.name(), "Alphonso Mangoes");
        assert_eq!(product.quantity(), 100);
        assert_eq!(product.origin(), "Ratnagiri");
        assert_eq!(product.base_price(), 1000.0);
        assert!(product.is_feasible());
    }

    #[test]
    fn test_product_rejects_non_positive_prices() {
        assert!(matches!(
            Product::new("x", 0.0, 1.0, 1.0),
            Err(NegotiationError::InvalidProduct(_))
        ));
        assert!(Product::new("x", 10.0, -1.0, 1.0).is_err());
        assert!(Product::new("x", 10.0, 5.0, 0.0).is_err());
        assert!(Product::new("x", f64::NAN, 5.0, 5.0).is_err());
    }

    #[test]
    fn test_product_rejects_floor_above_market() {
        let err = Product::new("x", 100.0, 120.0, 150.0).unwrap_err();
        assert!(err.to_string().contains("exceeds base price"));
    }

    #[test]
    fn test_budget_below_floor_is_valid() {
        let product = Product::new("x", 1000.0, 950.0, 500.0).unwrap();
        assert!(!product.is_feasible());
    }

    #[test]
    fn test_party_counterpart() {
        assert_eq!(Party::Buyer.counterpart(), Party::Seller);
        assert_eq!(Party::Seller.counterpart(), Party::Buyer);
    }

    #[test]
    fn test_digest_consistency() {
        let history = vec![
            Offer { price: 1500.0, round: 1, party: Party::Seller },
            Offer { price: 600.0, round: 1, party: Party::Buyer },
        ];

        let digest1 = TranscriptDigest::from_history(&history);
        let digest2 = TranscriptDigest::from_history(&history);
        assert_eq!(digest1, digest2);

        let digest3 = TranscriptDigest::from_history(&history[..1]);
        assert_ne!(digest1, digest3);
    }

    #[test]
    fn test_digest_hex_conversion() {
        let digest = TranscriptDigest::from_history(&[]);
        let parsed = TranscriptDigest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);
        assert!(TranscriptDigest::from_hex("abcd").is_err());
    }
}
