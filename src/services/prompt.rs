use crate::{
    schemas::ResponseSchema,
    types::{ItineraryData, ItineraryRequest},
};

fn route(request: &ItineraryRequest) -> String {
    if request.origin.is_empty() {
        format!("visiting {}", request.destination)
    } else {
        format!("traveling from {} to {}", request.origin, request.destination)
    }
}

/// Prompt asking the model for an `ItineraryData` JSON object.
///
/// The contract is the generated `ItineraryData` schema, so field names and
/// descriptions always match what the validator accepts.
pub fn build_itinerary_prompt(request: &ItineraryRequest) -> String {
    format!(
        "You're an AI itinerary planner. Plan the best itinerary for {} covering all major tourist places over {} days.\n\n\
Plan it for a {} budget with interests in: {}.\n\n\
Respond with a single JSON object that validates against this JSON Schema (draft-07):\n{}\n\n\
Include:\n\
- Morning, afternoon, and evening activities for each day with exact locations\n\
- Realistic GPS coordinates for each location\n\
- Breakfast, lunch, and dinner suggestions with local cuisine\n\
- Estimated costs in USD as plain numbers\n\
- Accommodation recommendations suited to a {} budget\n\
- One entry in \"days\" for each of the {} days",
        route(request),
        request.days,
        request.budget,
        request.interests_csv(),
        ItineraryData::schema().to_pretty_string(),
        request.budget,
        request.days,
    )
}

/// Prompt asking for a formatted prose plan from Day 1 to Day N.
pub fn build_prose_prompt(request: &ItineraryRequest) -> String {
    format!(
        "You're an AI itinerary planner. Plan the best itinerary for {} days to cover all major tourist places from {}. \
Plan it with user interests: '{}' and budget level: '{}'. \
Give the plan as a well formatted string with bullet points and bold wherever necessary from Day 1 to Day {}, including food, travel and other costs.",
        request.days,
        request.destination,
        request.interests_csv(),
        request.budget,
        request.days,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BudgetTier;

    fn request() -> ItineraryRequest {
        ItineraryRequest::new("Lisbon")
            .unwrap()
            .with_origin("Madrid")
            .with_days(4)
            .with_budget(BudgetTier::Budget)
            .with_interests(["food", "music"])
    }

    #[test]
    fn json_prompt_spells_out_the_contract() {
        let prompt = build_itinerary_prompt(&request());

        assert!(prompt.contains("traveling from Madrid to Lisbon"));
        assert!(prompt.contains("over 4 days"));
        assert!(prompt.contains("budget budget"));
        assert!(prompt.contains("food, music"));
        assert!(prompt.contains("\"totalEstimatedCost\""));
        assert!(prompt.contains("\"estimatedCost\""));
        assert!(prompt.contains("Estimated cost of the whole trip in USD"));
        assert!(prompt.contains(&ItineraryData::schema().to_pretty_string()));
    }

    #[test]
    fn json_prompt_without_origin() {
        let request = ItineraryRequest::new("Kyoto").unwrap();
        let prompt = build_itinerary_prompt(&request);

        assert!(prompt.contains("visiting Kyoto"));
        assert!(prompt.contains("historical places"));
    }

    #[test]
    fn prose_prompt_names_the_day_range() {
        let prompt = build_prose_prompt(&request());

        assert!(prompt.contains("from Day 1 to Day 4"));
        assert!(prompt.contains("budget level: 'budget'"));
        assert!(prompt.contains("interests: 'food, music'"));
    }
}
