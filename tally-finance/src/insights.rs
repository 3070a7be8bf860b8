//! Spending insights: category totals grouped by share of monthly salary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tally_core::{Category, TransactionRecord};

/// Share of salary up to which a category counts as low spend (percent).
pub const LOW_MAX_PCT: f64 = 10.0;
/// Share of salary up to which a category counts as medium spend (percent).
pub const MEDIUM_MAX_PCT: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: Category,
    pub spend: f64,
    /// Percent of salary, one decimal; `None` without a salary
    pub pct_of_income: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grouped {
    pub low: Vec<CategorySpend>,
    pub medium: Vec<CategorySpend>,
    pub high: Vec<CategorySpend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    pub total_spend: f64,
    pub income: f64,
    pub remaining: f64,
    pub grouped: Grouped,
    pub suggestion: String,
}

/// Summarize debit records against an optional monthly salary.
pub fn summarize(records: &[TransactionRecord], salary: Option<f64>) -> SpendingInsights {
    let income = salary.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(0.0);

    let mut totals: HashMap<Category, f64> = HashMap::new();
    for record in records.iter().filter(|r| r.is_debit()) {
        *totals.entry(record.category).or_default() += record.amount;
    }
    let total_spend: f64 = totals.values().sum();

    let mut grouped = Grouped::default();
    for (category, spend) in totals {
        let pct_of_income = (income > 0.0).then(|| round1(spend / income * 100.0));
        let item = CategorySpend {
            category,
            spend: round2(spend),
            pct_of_income,
        };
        match band(pct_of_income) {
            Band::Low => grouped.low.push(item),
            Band::Medium => grouped.medium.push(item),
            Band::High => grouped.high.push(item),
        }
    }

    for group in [&mut grouped.low, &mut grouped.medium, &mut grouped.high] {
        group.sort_by(|a, b| b.spend.total_cmp(&a.spend).then(a.category.cmp(&b.category)));
    }

    let suggestion = suggest(total_spend, income, &grouped);

    SpendingInsights {
        total_spend: round2(total_spend),
        income: round2(income),
        remaining: round2(income - total_spend),
        grouped,
        suggestion,
    }
}

/// Band of a category; everything is low when no salary is known.
pub fn band(pct_of_income: Option<f64>) -> Band {
    match pct_of_income {
        None => Band::Low,
        Some(p) if p <= LOW_MAX_PCT => Band::Low,
        Some(p) if p <= MEDIUM_MAX_PCT => Band::Medium,
        Some(_) => Band::High,
    }
}

fn suggest(total_spend: f64, income: f64, grouped: &Grouped) -> String {
    if income <= 0.0 {
        return "Add your monthly salary to unlock percentage based insights and suggestions."
            .to_string();
    }

    let mut parts = Vec::new();
    if total_spend > income {
        parts.push("Your total expenses exceed your salary. Consider budgeting more strictly.".to_string());
    }

    let pct = |item: &CategorySpend| item.pct_of_income.unwrap_or(0.0);
    if let Some(top) = grouped.high.first() {
        parts.push(format!(
            "High spending detected in {} (~{:.1}% of salary). Try setting a category cap.",
            top.category,
            pct(top)
        ));
    } else if let Some(top) = grouped.medium.first() {
        parts.push(format!(
            "Moderate spending on {} (~{:.1}% of salary). Track it weekly to prevent overspending.",
            top.category,
            pct(top)
        ));
    } else {
        parts.push("Your spending is under control. Keep tracking regularly.".to_string());
    }

    parts.join(" ")
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
