//! Demo catalog, difficulty presets and concurrent batch runs

use crate::config::NegotiationConfig;
use crate::error::{NegotiationError, Result};
use crate::negotiation::{NegotiationEngine, NegotiationOutcome};
use crate::types::Product;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much room the two sides leave each other
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// (budget, seller floor) as fractions of the market price
    pub fn ratios(self) -> (f64, f64) {
        match self {
            Difficulty::Easy => (1.2, 0.8),
            Difficulty::Medium => (1.0, 0.85),
            Difficulty::Hard => (0.9, 0.82),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Catalog entry before a budget and floor are attached
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub quality_grade: String,
    pub origin: String,
    pub base_price: f64,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl CatalogItem {
    /// Build a product with budget and floor taken from `difficulty`
    pub fn priced(&self, difficulty: Difficulty) -> Result<Product> {
        let (budget_ratio, floor_ratio) = difficulty.ratios();
        let budget = (self.base_price * budget_ratio).round();
        let min_price = (self.base_price * floor_ratio).round();

        let mut product = Product::new(self.name.clone(), self.base_price, min_price, budget)?
            .with_category(self.category.clone())
            .with_quantity(self.quantity)
            .with_quality_grade(self.quality_grade.clone())
            .with_origin(self.origin.clone());
        for (key, value) in &self.attributes {
            product = product.with_attribute(key.clone(), value.clone());
        }
        Ok(product)
    }
}

/// Two mango lots used by the `bench` command
pub fn sample_catalog() -> Vec<CatalogItem> {
    let attributes = |ripeness: &str, export_grade: bool| {
        let mut map = serde_json::Map::new();
        map.insert("ripeness".to_string(), ripeness.into());
        map.insert("export_grade".to_string(), export_grade.into());
        map
    };

    vec![
        CatalogItem {
            name: "Alphonso Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 100,
            quality_grade: "A".to_string(),
            origin: "Ratnagiri".to_string(),
            base_price: 180000.0,
            attributes: attributes("optimal", true),
        },
        CatalogItem {
            name: "Kesar Mangoes".to_string(),
            category: "Mangoes".to_string(),
            quantity: 150,
            quality_grade: "B".to_string(),
            origin: "Gujarat".to_string(),
            base_price: 150000.0,
            attributes: attributes("semi-ripe", false),
        },
    ]
}

/// One product priced at one difficulty
#[derive(Clone, Debug)]
pub struct Scenario {
    pub difficulty: Difficulty,
    pub product: Product,
}

impl Scenario {
    /// Every catalog item at every difficulty, item-major
    pub fn matrix(catalog: &[CatalogItem]) -> Result<Vec<Scenario>> {
        let mut scenarios = Vec::with_capacity(catalog.len() * Difficulty::ALL.len());
        for item in catalog {
            for difficulty in Difficulty::ALL {
                scenarios.push(Scenario {
                    difficulty,
                    product: item.priced(difficulty)?,
                });
            }
        }
        Ok(scenarios)
    }
}

/// Finished scenario
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub product: String,
    pub difficulty: Difficulty,
    pub outcome: NegotiationOutcome,
}

/// Run one scenario to completion with the stock policies
pub fn run_scenario(scenario: Scenario, config: NegotiationConfig) -> Result<ScenarioOutcome> {
    let product = scenario.product.name().to_string();
    let mut engine = NegotiationEngine::with_default_policies(scenario.product, config)?;
    let outcome = engine.run()?;

    tracing::debug!(
        "{} ({}) finished as {:?}",
        product,
        scenario.difficulty,
        outcome.result.status
    );

    Ok(ScenarioOutcome {
        product,
        difficulty: scenario.difficulty,
        outcome,
    })
}

/// Run scenarios concurrently on the blocking pool; results keep input order
pub async fn run_batch(
    scenarios: Vec<Scenario>,
    config: NegotiationConfig,
) -> Result<Vec<ScenarioOutcome>> {
    config.validate()?;

    let handles = scenarios.into_iter().map(|scenario| {
        let config = config.clone();
        tokio::task::spawn_blocking(move || run_scenario(scenario, config))
    });

    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(|e| NegotiationError::Internal(e.to_string()))?)
        .collect()
}
