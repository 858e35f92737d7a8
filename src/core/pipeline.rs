use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{stages::PipelineState, trace::StageTrace};
use crate::{
    error::{PlannerError, Result},
    gazetteer::{Gazetteer, PlaceLookup},
    mock::{MockGenerator, MockParams},
    parsing::{locate_candidate, repair, segment},
    schemas::{enrich_coordinates, Validator},
    services::{build_itinerary_prompt, build_prose_prompt, ModelClient},
    types::{ItineraryData, ItineraryRequest, PipelineOutcome, PipelineRun, MAX_TRIP_DAYS},
};

/// Turns raw model text into an itinerary, degrading step by step.
///
/// Runs are synchronous and share nothing but the read-only gazetteer, so one
/// pipeline can serve any number of concurrent runs.
#[derive(Debug, Clone)]
pub struct ItineraryPipeline {
    lookup: Arc<dyn PlaceLookup>,
    validator: Validator,
    max_days: usize,
    mock: MockGenerator,
}

impl Default for ItineraryPipeline {
    fn default() -> Self {
        Self::new()
    }
}

struct RunContext {
    trace: StageTrace,
    warnings: Vec<String>,
    started: Instant,
}

impl RunContext {
    fn new() -> Self {
        Self {
            trace: StageTrace::new(),
            warnings: Vec::new(),
            started: Instant::now(),
        }
    }

    fn enter(&mut self, state: PipelineState, detail: Option<String>) {
        self.trace.enter(state, detail);
    }

    fn degrade(&mut self, err: &PlannerError) {
        warn!(
            target: "tripplanner::pipeline",
            code = err.error_code(),
            stage = self.trace.last_state().map(|s| s.as_str()),
            "{}",
            err
        );
        self.warnings.push(format!("{}: {}", err.error_code(), err));
    }

    fn finish(self, outcome: PipelineOutcome) -> PipelineRun {
        let duration: Duration = self.started.elapsed();
        info!(
            target: "tripplanner::pipeline",
            outcome = outcome.kind(),
            states = self.trace.len(),
            degradations = self.warnings.len(),
            elapsed_ms = duration.as_millis() as u64,
            "Pipeline run finished"
        );
        PipelineRun::new(outcome, self.trace.into_records(), self.warnings, duration)
    }
}

impl ItineraryPipeline {
    pub fn new() -> Self {
        Self {
            lookup: Gazetteer::builtin(),
            validator: Validator::default(),
            max_days: MAX_TRIP_DAYS as usize,
            mock: MockGenerator::new(),
        }
    }

    pub fn with_gazetteer(mut self, lookup: Arc<dyn PlaceLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Cap on the number of days kept from model output; clamped to `[1, MAX_TRIP_DAYS]`.
    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = max_days.clamp(1, MAX_TRIP_DAYS as usize);
        self
    }

    pub fn with_mock_generator(mut self, mock: MockGenerator) -> Self {
        self.mock = mock;
        self
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    pub fn max_days(&self) -> usize {
        self.max_days
    }

    /// Run the full extract / repair / segment chain over raw model text.
    pub fn process(&self, raw: &str) -> PipelineRun {
        let mut run = RunContext::new();
        run.enter(
            PipelineState::RawTextReceived,
            Some(format!("{} chars", raw.chars().count())),
        );

        let candidate = locate_candidate(raw);
        let extract_detail = match &candidate {
            Ok(found) => format!(
                "{} block at offset {} ({} chars)",
                found.strategy.as_str(),
                found.start,
                found.text.len()
            ),
            Err(_) => "no candidate block".to_string(),
        };
        run.enter(PipelineState::Extracting, Some(extract_detail));

        let (repair_input, parsed) = match candidate {
            Ok(found) => match serde_json::from_str::<Value>(found.text) {
                Ok(value) => (found.text, Some(value)),
                Err(err) => {
                    run.degrade(&PlannerError::Serialization(err));
                    (found.text, None)
                }
            },
            Err(err) => {
                run.degrade(&err);
                (raw, None)
            }
        };

        let validated_once = parsed.is_some();
        if let Some(value) = parsed {
            run.enter(PipelineState::Validating, None);
            match self.validator.validate(&value) {
                Ok(itinerary) => return self.finish_structured(run, itinerary),
                Err(err) => run.degrade(&err),
            }
        }

        let repaired = repair(repair_input);
        let unchanged = matches!(&repaired, Ok(done) if done.applied.is_empty());
        let repair_detail = match &repaired {
            Ok(_) if unchanged && validated_once => {
                "no transform changed the text, skipping retry".to_string()
            }
            Ok(_) if unchanged => "no transform changed the text".to_string(),
            Ok(done) => done.applied.join(", "),
            Err(_) => "transforms applied, parse still failing".to_string(),
        };
        run.enter(PipelineState::Repairing, Some(repair_detail));

        match repaired {
            // Same value as the first pass; validating it again cannot succeed.
            Ok(_) if unchanged && validated_once => {}
            Ok(done) => {
                run.enter(PipelineState::Validating, Some("retry after repair".to_string()));
                match self.validator.validate(&done.value) {
                    Ok(itinerary) => return self.finish_structured(run, itinerary),
                    Err(err) => run.degrade(&err),
                }
            }
            Err(err) => run.degrade(&err),
        }

        run.enter(PipelineState::Segmenting, None);
        let view = segment(raw);
        if view.has_no_days() {
            warn!(
                target: "tripplanner::pipeline",
                "No day headers found; callers should show the raw text"
            );
        }
        run.enter(
            PipelineState::PartialView,
            Some(format!("{} day sections", view.days.len())),
        );

        run.finish(PipelineOutcome::Partial {
            view,
            raw: raw.to_string(),
        })
    }

    fn finish_structured(&self, mut run: RunContext, mut itinerary: ItineraryData) -> PipelineRun {
        if itinerary.days.len() > self.max_days {
            warn!(
                target: "tripplanner::pipeline",
                received = itinerary.days.len(),
                kept = self.max_days,
                "Truncating itinerary to the day ceiling"
            );
            run.warnings.push(format!(
                "truncated {} days to {}",
                itinerary.days.len(),
                self.max_days
            ));
            itinerary.days.truncate(self.max_days);
        }

        let report = enrich_coordinates(&mut itinerary, self.lookup.as_ref());
        run.enter(
            PipelineState::Enriching,
            Some(format!(
                "{} located, {} already located, {} missed",
                report.enriched,
                report.already_located,
                report.misses.len()
            )),
        );
        run.warnings.extend(
            report
                .misses
                .into_iter()
                .map(|miss| format!("ENRICHMENT_MISS: {}", miss)),
        );

        run.enter(
            PipelineState::StructuredSuccess,
            Some(format!("{} days", itinerary.days.len())),
        );
        run.finish(PipelineOutcome::Structured { itinerary })
    }

    /// Build the offline itinerary for a request without touching the model.
    pub fn synthesize(&self, request: &ItineraryRequest) -> PipelineRun {
        self.synthesize_with(RunContext::new(), request)
    }

    fn synthesize_with(&self, mut run: RunContext, request: &ItineraryRequest) -> PipelineRun {
        run.enter(
            PipelineState::MockGenerating,
            Some(format!("{} days in {}", request.days, request.destination)),
        );

        let text = self.mock.generate(&MockParams::from(request));
        let view = segment(&text);

        run.enter(
            PipelineState::StructuredSuccess,
            Some("synthetic itinerary".to_string()),
        );
        run.finish(PipelineOutcome::Synthetic { view, text })
    }

    /// Handle the collaborator's result: raw text goes through `process`,
    /// a transport failure switches to the mock generator.
    pub fn run(&self, request: &ItineraryRequest, upstream: Result<String>) -> PipelineRun {
        match upstream {
            Ok(raw) => {
                let mut finished = self.process(&raw);
                if let Some(itinerary) = finished.outcome.itinerary() {
                    if itinerary.days.len() != request.days as usize {
                        debug!(
                            target: "tripplanner::pipeline",
                            requested = request.days,
                            received = itinerary.days.len(),
                            "Model returned a different number of days"
                        );
                        let note = format!(
                            "requested {} days, model returned {}",
                            request.days,
                            itinerary.days.len()
                        );
                        finished.warnings.push(note);
                    }
                }
                finished
            }
            Err(err) => {
                let mut run = RunContext::new();
                run.degrade(&err);
                self.synthesize_with(run, request)
            }
        }
    }

    /// Ask the model for a JSON itinerary and run the result through the pipeline.
    pub async fn plan(&self, client: &ModelClient, request: &ItineraryRequest) -> PipelineRun {
        self.ask(client, request, build_itinerary_prompt(request), "json")
            .await
    }

    /// Ask the model for a prose plan; the answer normally ends as a segmented view.
    pub async fn plan_prose(
        &self,
        client: &ModelClient,
        request: &ItineraryRequest,
    ) -> PipelineRun {
        self.ask(client, request, build_prose_prompt(request), "prose")
            .await
    }

    async fn ask(
        &self,
        client: &ModelClient,
        request: &ItineraryRequest,
        prompt: String,
        style: &'static str,
    ) -> PipelineRun {
        info!(
            target: "tripplanner::pipeline",
            model = client.model(),
            destination = %request.destination,
            days = request.days,
            style,
            "Requesting itinerary"
        );
        let upstream = client.complete(&prompt).await;
        self.run(request, upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BudgetTier;
    use chrono::NaiveDate;
    use serde_json::json;
    use PipelineState::*;

    fn pipeline() -> ItineraryPipeline {
        ItineraryPipeline::new()
            .with_gazetteer(Arc::new(Gazetteer::from_places([("Paris", 48.8566, 2.3522)])))
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ItineraryPipeline>();
    }

    #[test]
    fn clean_json_skips_repair() {
        let raw = format!(
            "Plan below.\n{}\nBon voyage!",
            json!({"summary": "Paris", "days": [{"day": 1, "activities": [{"title": "Louvre", "location": "Paris"}]}]})
        );
        let run = pipeline().process(&raw);

        assert_eq!(
            run.states(),
            vec![RawTextReceived, Extracting, Validating, Enriching, StructuredSuccess]
        );
        let itinerary = run.outcome.itinerary().unwrap();
        assert!(itinerary.days[0].activities[0].coordinates.is_some());
        assert!(run.warnings.is_empty());
    }

    #[test]
    fn trailing_commas_are_repaired_then_validated() {
        let run = pipeline().process(r#"Here: {"summary": "x", "days": [],} thanks"#);

        assert_eq!(
            run.states(),
            vec![RawTextReceived, Extracting, Repairing, Validating, Enriching, StructuredSuccess]
        );
        assert_eq!(run.outcome.kind(), "structured");
        assert!(run.warnings[0].starts_with("SERIALIZATION_ERROR"));
    }

    #[test]
    fn fenced_json_without_braces_in_prose_is_recovered() {
        let run = pipeline().process("```json\n{'summary': 'Fenced', 'days': []}\n```");
        assert_eq!(run.outcome.itinerary().unwrap().summary, "Fenced");
    }

    #[test]
    fn invalid_shape_falls_through_to_segmenting() {
        let run = pipeline().process("{\"days\": \"none\"}\nDay 1: Arrival\nHotel");

        assert_eq!(
            run.states(),
            vec![RawTextReceived, Extracting, Validating, Repairing, Segmenting, PartialView]
        );
        let view = run.outcome.view().unwrap();
        assert_eq!(view.days.last().unwrap().title, "Day 1: Arrival");

        let failures = run
            .warnings
            .iter()
            .filter(|w| w.starts_with("VALIDATION_FAILURE"))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn changed_text_is_validated_again_after_repair() {
        let run = pipeline().process("{\"days\": 'none',}\nDay 1: Arrival\nHotel");

        assert_eq!(
            run.states(),
            vec![
                RawTextReceived,
                Extracting,
                Repairing,
                Validating,
                Segmenting,
                PartialView
            ]
        );
    }

    #[test]
    fn loose_model_json_stays_structured() {
        let run = pipeline().process(
            r#"Plan: {"summary":"Paris","days":[{"day":1,"activities":[{"title":"Louvre","location":"Paris","duration":2,"time":9}]}]}"#,
        );
        assert_eq!(
            run.states(),
            vec![RawTextReceived, Extracting, Validating, Enriching, StructuredSuccess]
        );
        let activity = &run.outcome.itinerary().unwrap().days[0].activities[0];
        assert_eq!(activity.duration, "2");
        assert!(activity.coordinates.is_some());

        let run = pipeline().process(r#"{"days":[{"day":1,"meals":{"lunch":"Cafe"}}]}"#);
        assert_eq!(run.outcome.kind(), "structured");
        assert!(run.outcome.itinerary().unwrap().days[0].meals.is_empty());
    }

    #[test]
    fn hopeless_text_without_days_is_still_a_view() {
        let run = pipeline().process("{ this is not json");
        assert_eq!(run.terminal_state(), Some(PartialView));
        assert!(run.outcome.view().unwrap().has_no_days());
        assert_eq!(run.outcome.source_text(), Some("{ this is not json"));
    }

    #[test]
    fn empty_text_is_a_partial_view() {
        let run = pipeline().process("");
        assert_eq!(run.terminal_state(), Some(PartialView));
        assert!(!run.passed_through(Validating));
    }

    #[test]
    fn long_itineraries_are_truncated() {
        let days: Vec<_> = (1..=35).map(|day| json!({"day": day})).collect();
        let raw = json!({"days": days}).to_string();

        let run = pipeline().with_max_days(7).process(&raw);
        assert_eq!(run.outcome.itinerary().unwrap().days.len(), 7);

        let run = pipeline().with_max_days(500).process(&raw);
        assert_eq!(run.outcome.itinerary().unwrap().days.len(), 30);
    }

    #[test]
    fn transport_failure_uses_the_mock() {
        let request = ItineraryRequest::new("Tokyo")
            .unwrap()
            .with_days(3)
            .with_budget(BudgetTier::Luxury);
        let mock = MockGenerator::new().with_fixed_date(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        let run = pipeline()
            .with_mock_generator(mock)
            .run(&request, Err(PlannerError::Transport("timed out".into())));

        assert_eq!(run.states(), vec![MockGenerating, StructuredSuccess]);
        assert!(run.warnings[0].starts_with("TRANSPORT_ERROR"));
        match &run.outcome {
            PipelineOutcome::Synthetic { view, text } => {
                assert!(text.contains("**Generated**: 2026-04-01"));
                let titles: Vec<_> = view.days.iter().map(|d| d.title.as_str()).collect();
                assert!(titles.contains(&"Day 1: Arrival & Orientation"));
                assert!(titles.contains(&"Day 3: Final Exploration & Departure"));
            }
            other => panic!("expected synthetic outcome, got {}", other.kind()),
        }
    }

    #[test]
    fn day_count_mismatch_is_noted() {
        let request = ItineraryRequest::new("Paris").unwrap().with_days(2);
        let run = pipeline().run(&request, Ok(r#"{"days": [{"day": 1}]}"#.to_string()));
        assert!(run.outcome.is_structured());
        assert!(run.warnings.iter().any(|w| w.contains("requested 2 days")));
    }
}
