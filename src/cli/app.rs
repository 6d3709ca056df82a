//! Bargain application wiring the engine to personas and reports

use crate::config::NegotiationConfig;
use crate::error::Result;
use crate::negotiation::{MultiplierRule, NegotiationEngine, NegotiationOutcome};
use crate::persona::{Explainer, TemplateExplainer};
use crate::scenario::{run_batch, sample_catalog, Scenario, ScenarioOutcome};
use crate::types::Product;
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use super::commands::Overrides;

/// Negotiation outcome together with its narrated dialogue
#[derive(Clone, Debug, Serialize)]
pub struct Transcript {
    pub outcome: NegotiationOutcome,
    pub lines: Vec<String>,
    pub digest: String,
}

/// Main bargain application
pub struct BargainApp {
    config: NegotiationConfig,
    explainer: Box<dyn Explainer + Send + Sync>,
}

impl BargainApp {
    /// Create an app with the stock template explainer
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            config,
            explainer: Box::new(TemplateExplainer::default()),
        }
    }

    /// Swap in a different explainer
    pub fn with_explainer(mut self, explainer: Box<dyn Explainer + Send + Sync>) -> Self {
        self.explainer = explainer;
        self
    }

    /// Read the config file if given, then apply command-line overrides
    pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<NegotiationConfig> {
        let mut config = match path {
            Some(path) => NegotiationConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => NegotiationConfig::default(),
        };

        if let Some(max_rounds) = overrides.max_rounds {
            config.max_rounds = max_rounds;
        }
        if let Some(epsilon) = overrides.epsilon {
            config.convergence_epsilon = Some(epsilon);
        }
        if let Some(seed) = overrides.seed {
            config.multiplier = MultiplierRule::Seeded(seed);
        }
        if overrides.closing_pressure {
            config.multiplier = MultiplierRule::closing_pressure();
        }

        config.validate().context("invalid negotiation settings")?;
        Ok(config)
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Negotiate one product, narrating every event after the engine decides it
    pub fn negotiate(&self, product: Product) -> Result<Transcript> {
        let mut engine = NegotiationEngine::with_default_policies(product, self.config.clone())?;
        let mut lines = Vec::new();

        while !engine.state().is_terminal() {
            for event in engine.step()? {
                let line = self.explainer.explain(&event, engine.product());
                tracing::debug!("{}", line);
                lines.push(line);
            }
        }

        let outcome = engine.outcome()?;
        let digest = outcome.digest().to_hex();

        tracing::info!(
            "Negotiation for {} ended as {:?} after {} rounds",
            engine.product().name(),
            outcome.result.status,
            outcome.result.rounds_used
        );

        Ok(Transcript {
            outcome,
            lines,
            digest,
        })
    }

    /// Run the sample catalog at every difficulty in parallel
    pub async fn bench(&self) -> Result<Vec<ScenarioOutcome>> {
        let scenarios = Scenario::matrix(&sample_catalog())?;
        tracing::info!("Running {} scenarios", scenarios.len());
        run_batch(scenarios, self.config.clone()).await
    }
}
