use std::fmt;

use serde::{Deserialize, Serialize};

use super::itinerary::MAX_TRIP_DAYS;
use crate::error::{PlannerError, Result};

/// Trip length used when the caller's day count cannot be parsed.
pub const DEFAULT_TRIP_DAYS: u32 = 3;

/// Interest used when the caller supplies none.
pub const DEFAULT_INTEREST: &str = "historical places";

/// Spending level for the trip.
///
/// Callers may pass any descriptive string; anything outside the three known
/// tiers is kept verbatim in `Other` and priced like `Moderate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetTier {
    Budget,
    #[default]
    Moderate,
    Luxury,
    Other(String),
}

impl BudgetTier {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "budget" | "cheap" | "low" => BudgetTier::Budget,
            "moderate" | "medium" | "mid-range" => BudgetTier::Moderate,
            "luxury" | "high" => BudgetTier::Luxury,
            _ => BudgetTier::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BudgetTier::Budget => "budget",
            BudgetTier::Moderate => "moderate",
            BudgetTier::Luxury => "luxury",
            BudgetTier::Other(label) => label,
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for BudgetTier {
    fn from(raw: String) -> Self {
        BudgetTier::parse(&raw)
    }
}

impl From<BudgetTier> for String {
    fn from(tier: BudgetTier) -> Self {
        tier.as_str().to_string()
    }
}

/// Clamp a requested day count into `[1, MAX_TRIP_DAYS]`.
pub fn clamp_days(days: i64) -> u32 {
    days.clamp(1, i64::from(MAX_TRIP_DAYS)) as u32
}

/// Parse a free-form day count, falling back to `DEFAULT_TRIP_DAYS` before clamping.
pub fn parse_days(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|days| *days != 0)
        .map(clamp_days)
        .unwrap_or(DEFAULT_TRIP_DAYS)
}

/// Parameters for one itinerary request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    /// Departure place; may be empty
    pub origin: String,
    /// Destination; never blank
    pub destination: String,
    /// Trip length, always within `[1, MAX_TRIP_DAYS]`
    pub days: u32,
    pub budget: BudgetTier,
    /// Interest tags in caller order
    pub interests: Vec<String>,
}

impl ItineraryRequest {
    pub fn new(destination: impl Into<String>) -> Result<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(PlannerError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }

        Ok(Self {
            origin: String::new(),
            destination,
            days: DEFAULT_TRIP_DAYS,
            budget: BudgetTier::default(),
            interests: Vec::new(),
        })
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim().to_string();
        self
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = clamp_days(days);
        self
    }

    pub fn with_budget(mut self, budget: BudgetTier) -> Self {
        self.budget = budget;
        self
    }

    /// Accepts a comma-separated string or any list of tags; blanks are dropped.
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.interests = interests
            .into_iter()
            .flat_map(|item| {
                item.as_ref()
                    .split(',')
                    .map(|part| part.trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|part| !part.is_empty())
            .collect();
        self
    }

    /// Interests with the default applied when none were given.
    pub fn effective_interests(&self) -> Vec<String> {
        if self.interests.is_empty() {
            vec![DEFAULT_INTEREST.to_string()]
        } else {
            self.interests.clone()
        }
    }

    pub fn interests_csv(&self) -> String {
        self.effective_interests().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_destination_is_rejected() {
        let err = ItineraryRequest::new("   ").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn days_are_clamped() {
        let request = ItineraryRequest::new("Lisbon").unwrap();
        assert_eq!(request.clone().with_days(0).days, 1);
        assert_eq!(request.clone().with_days(-4).days, 1);
        assert_eq!(request.clone().with_days(45).days, 30);
        assert_eq!(request.with_days(7).days, 7);
    }

    #[test]
    fn unparseable_days_fall_back_to_three() {
        assert_eq!(parse_days("five"), 3);
        assert_eq!(parse_days(""), 3);
        assert_eq!(parse_days("0"), 3);
        assert_eq!(parse_days("12"), 12);
        assert_eq!(parse_days("99"), 30);
    }

    #[test]
    fn interests_split_on_commas() {
        let request = ItineraryRequest::new("Kyoto")
            .unwrap()
            .with_interests(["temples, food", " ", "gardens"]);
        assert_eq!(request.interests, vec!["temples", "food", "gardens"]);
        assert_eq!(request.interests_csv(), "temples, food, gardens");
    }

    #[test]
    fn empty_interests_use_default() {
        let request = ItineraryRequest::new("Kyoto").unwrap();
        assert_eq!(request.interests_csv(), "historical places");
    }

    #[test]
    fn budget_tier_keeps_unknown_labels() {
        assert_eq!(BudgetTier::parse("Luxury"), BudgetTier::Luxury);
        assert_eq!(BudgetTier::parse("medium"), BudgetTier::Moderate);
        assert_eq!(
            BudgetTier::parse("shoestring"),
            BudgetTier::Other("shoestring".to_string())
        );
        assert_eq!(BudgetTier::Other("shoestring".into()).to_string(), "shoestring");
    }
}
