//! Outcome set: the ordered results a wheel can land on
//!
//! Order is significant - outcome `i` owns slice `i`. A set is frozen for the
//! lifetime of a round and may only be replaced between spins.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OutcomeError;

/// Cosmetic labels shown when no numeric outcomes are configured
pub const CURATED_LABELS: [&str; 12] = [
    "Support Badge: Midnight Patron",
    "Support Badge: Moonlit Ally",
    "Support Badge: Velvet Favor",
    "Support Badge: Crimson Thanks",
    "Message: “Well done — appreciated.”",
    "Message: “Noted with gratitude.”",
    "Message: “A graceful show of support.”",
    "Message: “Thank you.”",
    "Message: “You’re the best — thank you.”",
    "Support Badge: Royal Acknowledgment",
    "Support Badge: Dark Muse Supporter",
    "Message: “Your support is felt.”",
];

/// Category prefixes stripped for chip and wheel display
const LABEL_PREFIXES: [&str; 2] = ["Support Badge: ", "Message: "];

/// One possible spin result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Position in the set (and therefore slice index)
    pub id: usize,
    pub label: String,
    /// Numeric value for generated outcomes
    #[serde(default)]
    pub weight: Option<u64>,
}

impl Outcome {
    pub fn new(id: usize, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            weight: None,
        }
    }

    /// Label without its category prefix
    pub fn short_label(&self) -> &str {
        LABEL_PREFIXES
            .iter()
            .find_map(|p| self.label.strip_prefix(*p))
            .unwrap_or(self.label.as_str())
    }
}

/// Bounds for numeric outcome generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeConfig {
    pub min_count: usize,
    pub max_count: usize,
    pub min_value: u64,
    pub max_value: u64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            min_count: 6,
            max_count: 24,
            min_value: 5,
            max_value: 100_000,
        }
    }
}

impl OutcomeConfig {
    /// Reject inverted bounds
    pub fn validate(&self) -> Result<(), OutcomeError> {
        if self.min_count > self.max_count {
            return Err(OutcomeError::InvalidOutcomeConfig {
                reason: format!(
                    "min_count {} exceeds max_count {}",
                    self.min_count, self.max_count
                ),
            });
        }
        if self.min_value > self.max_value {
            return Err(OutcomeError::InvalidOutcomeConfig {
                reason: format!(
                    "min_value {} exceeds max_value {}",
                    self.min_value, self.max_value
                ),
            });
        }
        Ok(())
    }

    /// Clamp a requested count into [min_count, max_count]
    pub fn clamp_count(&self, requested: usize) -> usize {
        requested.clamp(self.min_count, self.max_count)
    }
}

/// Result of a generation request, reporting any clamping back to the caller
#[derive(Debug, Clone)]
pub struct Generated {
    pub outcomes: OutcomeSet,
    pub requested: usize,
    /// Count actually produced
    pub count: usize,
}

impl Generated {
    /// Whether the requested count was out of range
    pub fn was_clamped(&self) -> bool {
        self.requested != self.count
    }
}

/// Ordered, non-empty collection of outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSet {
    outcomes: Vec<Outcome>,
}

impl Default for OutcomeSet {
    fn default() -> Self {
        Self::curated()
    }
}

impl OutcomeSet {
    /// The built-in cosmetic outcomes
    pub fn curated() -> Self {
        Self {
            outcomes: CURATED_LABELS
                .iter()
                .enumerate()
                .map(|(id, label)| Outcome::new(id, *label))
                .collect(),
        }
    }

    /// Build from a fixed label list
    pub fn from_labels<I, S>(labels: I) -> Result<Self, OutcomeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcomes: Vec<Outcome> = labels
            .into_iter()
            .enumerate()
            .map(|(id, label)| Outcome::new(id, label))
            .collect();
        if outcomes.is_empty() {
            return Err(OutcomeError::EmptyLabels);
        }
        Ok(Self { outcomes })
    }

    /// Generate numeric outcomes, each value drawn independently and uniformly
    /// from [min_value, max_value]
    pub fn generate<R: Rng + ?Sized>(
        config: &OutcomeConfig,
        requested: usize,
        rng: &mut R,
    ) -> Result<Generated, OutcomeError> {
        config.validate()?;

        let count = config.clamp_count(requested);
        if count != requested {
            log::warn!(
                "Requested {} outcomes, clamped to {} (allowed {}..={})",
                requested,
                count,
                config.min_count,
                config.max_count
            );
        }

        let outcomes: Vec<Outcome> = (0..count)
            .map(|id| {
                let value = rng.random_range(config.min_value..=config.max_value);
                Outcome {
                    id,
                    label: format_amount(value),
                    weight: Some(value),
                }
            })
            .collect();

        if outcomes.is_empty() {
            return Err(OutcomeError::InvalidOutcomeConfig {
                reason: "bounds allow zero outcomes".to_string(),
            });
        }

        Ok(Generated {
            outcomes: Self { outcomes },
            requested,
            count,
        })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Outcome> {
        self.outcomes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    /// Angular width of one slice (2π / N)
    pub fn slice_width(&self) -> f64 {
        std::f64::consts::TAU / self.outcomes.len() as f64
    }
}

impl<'a> IntoIterator for &'a OutcomeSet {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Format a whole-dollar value with grouped thousands ("$12,345")
pub fn format_amount(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}", grouped)
}
