use tracing::debug;

use crate::{error::PlannerError, gazetteer::PlaceLookup, types::ItineraryData};

/// Counts from one enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Activities that gained coordinates
    pub enriched: usize,
    /// Activities that already carried coordinates
    pub already_located: usize,
    /// One message per activity left without coordinates
    pub misses: Vec<String>,
}

/// Fill in missing activity coordinates from `lookup`.
///
/// The lookup key is the activity location, or its title when the location is
/// blank. Misses and lookup errors leave the activity untouched.
pub fn enrich_coordinates(
    itinerary: &mut ItineraryData,
    lookup: &dyn PlaceLookup,
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();

    for activity in itinerary.activities_mut() {
        if activity.coordinates.is_some() {
            report.already_located += 1;
            continue;
        }

        let key = match activity.location.trim() {
            "" => activity.title.trim(),
            location => location,
        };

        let miss = match lookup.lookup(key) {
            Ok(Some(coordinates)) => {
                activity.coordinates = Some(coordinates);
                report.enriched += 1;
                continue;
            }
            Ok(None) => PlannerError::Enrichment(format!("no known coordinates for `{}`", key)),
            Err(err) => PlannerError::Enrichment(format!("lookup for `{}` failed: {}", key, err)),
        };

        debug!(
            target: "tripplanner::schema",
            code = miss.error_code(),
            activity = %activity.title,
            "{}",
            miss
        );
        report.misses.push(miss.to_string());
    }

    report
}
