//! Deterministic keyword rules mapping text to a spending category.
//!
//! Rules are evaluated top to bottom and the first match wins. Keyword sets
//! overlap (a "medical store" is both medical and groceries), so the order of
//! [`CategoryRule::standard`] is part of the classification behavior.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::Category;

/// One `(category, keywords)` rule as configuration data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase substrings; any one of them selects the category.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// The product's rule order.
    pub fn standard() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new(
                Category::Food,
                &[
                    "hotel", "restaurant", "cafe", "coffee", "tea", "pizza", "burger", "biryani",
                    "food", "dine", "meal",
                ],
            ),
            CategoryRule::new(
                Category::Medical,
                &["medical", "pharmacy", "clinic", "hospital", "tablet", "medicine", "apollo"],
            ),
            CategoryRule::new(
                Category::Travel,
                &[
                    "uber", "ola", "travel", "bus", "train", "flight", "metro", "fuel", "petrol",
                    "diesel", "parking", "toll",
                ],
            ),
            CategoryRule::new(
                Category::Groceries,
                &[
                    "grocery", "groceries", "supermarket", "mart", "vegetable", "dmart", "reliance",
                    "store",
                ],
            ),
            CategoryRule::new(
                Category::Clothing,
                &["shirt", "pant", "jeans", "dress", "clothing", "footwear", "shoes", "apparel"],
            ),
            CategoryRule::new(
                Category::Shopping,
                &["amazon", "flipkart", "myntra", "shopping", "order id", "invoice"],
            ),
        ]
    }
}

/// Compiled, immutable rule set.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<(Category, Regex)>,
}

impl CategoryRules {
    pub fn compile(rules: &[CategoryRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let alternation = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .map(|k| regex::escape(&k))
                .collect::<Vec<_>>()
                .join("|");
            if alternation.is_empty() {
                continue;
            }
            compiled.push((rule.category, Regex::new(&alternation)?));
        }
        Ok(Self { rules: compiled })
    }

    pub fn standard() -> Result<Self> {
        Self::compile(&CategoryRule::standard())
    }

    /// Classify free text; `Other` when no rule matches.
    pub fn classify(&self, text: &str) -> Category {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}
