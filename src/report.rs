//! Text reports for finished negotiations

use crate::negotiation::{DealResult, NegotiationStatus};
use serde::{Deserialize, Serialize};

/// Format a price as whole rupees with thousands separators
pub fn format_currency(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-₹{}", grouped)
    } else {
        format!("₹{}", grouped)
    }
}

/// One-run report, as shown after each negotiation
pub fn describe(result: &DealResult) -> String {
    match (result.status, result.final_price) {
        (NegotiationStatus::Deal, Some(price)) => format!(
            "✅ DEAL at {} in {} rounds\n   Savings vs budget: {} ({:.1}%)\n   Below Market: {:.1}%",
            format_currency(price),
            result.rounds_used,
            format_currency(result.budget_savings),
            result.budget_savings_pct,
            result.below_market_pct
        ),
        (NegotiationStatus::TimedOut, _) => {
            format!("⏱️ TIMED OUT after {} rounds", result.rounds_used)
        }
        _ => format!("❌ NO DEAL after {} rounds", result.rounds_used),
    }
}

/// Totals across a batch of runs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub deals_made: usize,
    pub timed_out: usize,
    /// Sum of budget savings over closed deals
    pub total_savings: f64,
}

impl BatchSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a DealResult>) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.runs += 1;
            if result.closed {
                summary.deals_made += 1;
                summary.total_savings += result.budget_savings;
            }
            if result.status == NegotiationStatus::TimedOut {
                summary.timed_out += 1;
            }
        }
        summary
    }

    /// Percentage of runs that closed
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.deals_made as f64 / self.runs as f64 * 100.0
    }

    pub fn render(&self) -> String {
        format!(
            "SUMMARY\nDeals Completed: {}/{}\nTimed Out: {}\nTotal Savings: {}\nSuccess Rate: {:.1}%",
            self.deals_made,
            self.runs,
            self.timed_out,
            format_currency(self.total_savings),
            self.success_rate()
        )
    }
}
