//! Offline itinerary text used for development and as the last-resort fallback.
//!
//! Output depends only on the parameters and the `**Generated**:` date line.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::types::{request::clamp_days, BudgetTier, ItineraryRequest};

pub const DEFAULT_DESTINATION: &str = "Your Destination";
pub const DEFAULT_INTERESTS: [&str; 3] = ["sightseeing", "food", "culture"];
pub const MAX_INTERESTS: usize = 3;

/// Line prefix of the only non-deterministic line in the output.
pub const GENERATED_PREFIX: &str = "**Generated**:";

/// Afternoon activities for middle days, cycled in order. `{dest}` is substituted.
pub const ACTIVITIES: [&str; 8] = [
    "Explore historic {dest} with a guided tour",
    "Visit local museums and cultural centers",
    "Day trip to nearby attractions",
    "Street food tour and cooking class",
    "Adventure activity: hiking, cycling, water sports",
    "Shopping at local markets and artisan shops",
    "Relax at parks, spas, or beaches",
    "Take a photography walk through scenic neighborhoods",
];

/// Inputs for one mock itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockParams {
    pub destinations: Vec<String>,
    pub days: u32,
    pub budget: String,
    /// Comma-separated interest tags
    pub interests: String,
}

impl MockParams {
    pub fn new(destination: impl Into<String>, days: u32, budget: &str, interests: &str) -> Self {
        Self {
            destinations: vec![destination.into()],
            days,
            budget: budget.to_string(),
            interests: interests.to_string(),
        }
    }
}

impl From<&ItineraryRequest> for MockParams {
    fn from(request: &ItineraryRequest) -> Self {
        Self {
            destinations: vec![request.destination.clone()],
            days: request.days,
            budget: request.budget.to_string(),
            interests: request.interests.join(", "),
        }
    }
}

/// Daily spend band for a tier label; unknown labels get the middle band.
pub fn daily_cost_band(budget: &str) -> &'static str {
    match BudgetTier::parse(budget) {
        BudgetTier::Luxury => "$400-500",
        BudgetTier::Budget => "$40-70",
        BudgetTier::Moderate | BudgetTier::Other(_) => "$120-180",
    }
}

/// First three non-blank interests, or the defaults when there are none.
pub fn interest_list(raw: &str) -> Vec<String> {
    let interests: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|interest| !interest.is_empty())
        .take(MAX_INTERESTS)
        .map(str::to_string)
        .collect();

    if interests.is_empty() {
        DEFAULT_INTERESTS.iter().map(|s| s.to_string()).collect()
    } else {
        interests
    }
}

fn destination_label(destinations: &[String]) -> &str {
    destinations
        .iter()
        .map(|d| d.trim())
        .find(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESTINATION)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Markdown block for one day.
fn day_block(day: u32, total: u32, destination: &str) -> String {
    if day == 1 {
        format!(
            "### Day {day}: Arrival & Orientation\n\
**Morning**: Arrive and settle into your accommodation.\n\
**Afternoon**: Walking tour of the neighborhood with lunch at a local cafe.\n\
**Evening**: Browse the main market street, then dinner at a recommended restaurant.\n\
**Suggested Activity**: Find a nearby park or waterfront to get your bearings."
        )
    } else if day == total {
        format!(
            "### Day {day}: Final Exploration & Departure\n\
**Morning**: Last-minute shopping or a place you missed.\n\
**Afternoon**: Pack up and get ready to leave.\n\
**Evening**: Farewell dinner at a favorite restaurant, then transfer to the airport or station.\n\
**Note**: Confirm your transfer in advance."
        )
    } else {
        let index = (day as usize).saturating_sub(2) % ACTIVITIES.len();
        let activity = ACTIVITIES[index].replace("{dest}", destination);
        format!(
            "### Day {day}: Exploration\n\
**Morning**: Breakfast at a local cafe, then start exploring.\n\
**Afternoon**: {activity}.\n\
**Evening**: Unwind at your accommodation or sample the nightlife.\n\
**Dining**: Try a restaurant recommended by locals."
        )
    }
}

/// Render the itinerary with an explicit generation date.
pub fn generate_at(params: &MockParams, generated_on: NaiveDate) -> String {
    let destination = destination_label(&params.destinations);
    let days = clamp_days(i64::from(params.days));
    let budget = match params.budget.trim() {
        "" => BudgetTier::default().to_string(),
        label => label.to_string(),
    };
    let interests = interest_list(&params.interests);

    let daily_plans = (1..=days)
        .map(|day| day_block(day, days, destination))
        .collect::<Vec<_>>()
        .join("\n\n");

    let suggested = interests
        .iter()
        .map(|interest| {
            format!(
                "- **{}**: Explore the local {} scene, classes, and cultural shows",
                capitalize(interest),
                interest.to_lowercase()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut sections = Vec::new();
    sections.push(format!("# {}-Day Itinerary for {}", days, destination));
    sections.push(format!(
        "## Trip Overview\nThis {}-day itinerary covers the best of {} on a {} budget, with a focus on {}.",
        days,
        destination,
        budget,
        interests.join(", ")
    ));
    sections.push("---".to_string());
    sections.push(format!("## Daily Breakdown\n\n{}", daily_plans));
    sections.push(
        "## Transportation\n\
- **Getting Around**: Public transport for daily travel; a travel card usually saves money.\n\
- **Airport Transfer**: Airport bus or train to the center, roughly 30-45 minutes.\n\
- **Inter-city Travel**: Regional trains or buses for scenic routes.\n\
- **Ride-sharing**: Ride-hailing apps are available in most areas."
            .to_string(),
    );
    sections.push(format!(
        "## Estimated Daily Costs ({} budget)\n\
- Accommodation, meals, activities, and local transport\n\
- **Daily Total: {}**",
        budget,
        daily_cost_band(&budget)
    ));
    sections.push(
        "## Recommended Restaurants & Cafes\n\
- Street food markets for breakfast\n\
- Mid-range restaurants for lunch\n\
- Fine dining for a special dinner\n\
- Cafes for coffee and snacks"
            .to_string(),
    );
    sections.push(
        "## Local Tips & Cultural Insights\n\
- Learn a few phrases in the local language\n\
- Respect dress codes at religious sites\n\
- Visit markets early for the best selection\n\
- Explore neighborhoods beyond the tourist areas"
            .to_string(),
    );
    sections.push(format!("## Suggested Activities & Attractions\n{}", suggested));
    sections.push("---".to_string());
    sections.push(format!(
        "{} {}\n**Note**: This is a sample itinerary. Adjust it to your preferences and current travel advisories.",
        GENERATED_PREFIX,
        generated_on.format("%Y-%m-%d")
    ));

    let mut text = sections.join("\n\n");
    text.push('\n');
    text
}

/// Mock generator with an optional pinned date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockGenerator {
    fixed_date: Option<NaiveDate>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    /// Render using the pinned date, or today's local date.
    pub fn generate(&self, params: &MockParams) -> String {
        let date = self
            .fixed_date
            .unwrap_or_else(|| Local::now().date_naive());
        info!(
            target: "tripplanner::pipeline",
            destination = destination_label(&params.destinations),
            days = params.days,
            "Generating mock itinerary"
        );
        generate_at(params, date)
    }
}

/// Render with today's local date.
pub fn generate(params: &MockParams) -> String {
    MockGenerator::new().generate(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn without_generated_line(text: &str) -> String {
        text.lines()
            .filter(|line| !line.starts_with(GENERATED_PREFIX))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn identical_inputs_differ_only_in_date_line() {
        let params = MockParams::new("Tokyo", 5, "luxury", "food");
        let first = generate_at(&params, date(2026, 1, 5));
        let second = generate_at(&params, date(2026, 9, 30));

        assert_ne!(first, second);
        assert_eq!(without_generated_line(&first), without_generated_line(&second));
        assert_eq!(first, generate_at(&params, date(2026, 1, 5)));
    }

    #[test]
    fn day_blocks_match_requested_length() {
        for n in 1..=30u32 {
            let text = generate_at(&MockParams::new("Rome", n, "budget", ""), date(2026, 3, 1));
            let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("### Day ")).collect();

            assert_eq!(headers.len(), n as usize, "n = {}", n);
            assert_eq!(headers[0], "### Day 1: Arrival & Orientation");
            if n > 1 {
                assert_eq!(
                    headers[n as usize - 1],
                    format!("### Day {}: Final Exploration & Departure", n)
                );
            }
            for header in &headers[1..headers.len().saturating_sub(1).max(1)] {
                assert!(header.ends_with(": Exploration"), "{}", header);
            }
        }
    }

    #[test]
    fn middle_days_cycle_activities() {
        assert!(day_block(2, 12, "Lima").contains("Explore historic Lima with a guided tour."));
        assert!(day_block(9, 12, "Lima").contains("Take a photography walk"));
        assert!(day_block(10, 12, "Lima").contains("Explore historic Lima"));
    }

    #[test]
    fn day_zero_is_a_middle_day() {
        let block = day_block(0, 5, "Lima");
        assert!(block.starts_with("### Day 0: Exploration"));
        assert!(block.contains("Explore historic Lima"));
    }

    #[test]
    fn cost_bands_by_tier() {
        assert_eq!(daily_cost_band("luxury"), "$400-500");
        assert_eq!(daily_cost_band("moderate"), "$120-180");
        assert_eq!(daily_cost_band("budget"), "$40-70");
        assert_eq!(daily_cost_band("backpacker"), "$120-180");
    }

    #[test]
    fn interests_and_destination_defaults() {
        let params = MockParams {
            destinations: vec!["  ".into()],
            days: 0,
            budget: String::new(),
            interests: " , ".into(),
        };
        let text = generate_at(&params, date(2026, 1, 1));

        assert!(text.starts_with("# 1-Day Itinerary for Your Destination"));
        assert!(text.contains("focus on sightseeing, food, culture"));
        assert!(text.contains("**Daily Total: $120-180**"));
        assert!(text.contains("- **Sightseeing**:"));
    }

    #[test]
    fn only_three_interests_are_kept() {
        assert_eq!(
            interest_list("art, jazz , wine, hiking"),
            vec!["art", "jazz", "wine"]
        );
    }

    #[test]
    fn day_count_is_clamped() {
        let text = generate_at(&MockParams::new("Oslo", 90, "budget", "fjords"), date(2026, 1, 1));
        assert!(text.starts_with("# 30-Day Itinerary for Oslo"));
        assert!(text.contains("### Day 30: Final Exploration & Departure"));
        assert!(!text.contains("### Day 31"));
    }
}
