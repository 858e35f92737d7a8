use super::{itinerary::ItineraryData, view::StructuredView};
use crate::core::stages::{PipelineState, StageRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal outcome of a pipeline run; callers branch on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// JSON was recovered, validated and enriched
    Structured { itinerary: ItineraryData },
    /// Only a segmented prose view could be built from the model text
    Partial { view: StructuredView, raw: String },
    /// The model was unreachable; offline mock text and its view
    Synthetic { view: StructuredView, text: String },
}

impl PipelineOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineOutcome::Structured { .. } => "structured",
            PipelineOutcome::Partial { .. } => "partial",
            PipelineOutcome::Synthetic { .. } => "synthetic",
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, PipelineOutcome::Structured { .. })
    }

    pub fn itinerary(&self) -> Option<&ItineraryData> {
        match self {
            PipelineOutcome::Structured { itinerary } => Some(itinerary),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&StructuredView> {
        match self {
            PipelineOutcome::Partial { view, .. } | PipelineOutcome::Synthetic { view, .. } => {
                Some(view)
            }
            PipelineOutcome::Structured { .. } => None,
        }
    }

    /// The text behind a view outcome, shown when the view has no days.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Partial { raw, .. } => Some(raw),
            PipelineOutcome::Synthetic { text, .. } => Some(text),
            PipelineOutcome::Structured { .. } => None,
        }
    }

    /// Always produce the `ItineraryData` shape, using the raw-text fallback for views.
    pub fn into_itinerary(self) -> ItineraryData {
        match self {
            PipelineOutcome::Structured { itinerary } => itinerary,
            PipelineOutcome::Partial { raw, .. } => ItineraryData::fallback_from_raw(&raw),
            PipelineOutcome::Synthetic { text, .. } => ItineraryData::fallback_from_raw(&text),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Terminal outcome
    pub outcome: PipelineOutcome,
    /// States visited, in order
    pub trace: Vec<StageRecord>,
    /// Non-fatal degradations, in order
    pub warnings: Vec<String>,
    /// Total execution duration
    pub duration: Duration,
}

impl PipelineRun {
    pub fn new(
        outcome: PipelineOutcome,
        trace: Vec<StageRecord>,
        warnings: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            outcome,
            trace,
            warnings,
            duration,
        }
    }

    pub fn states(&self) -> Vec<PipelineState> {
        self.trace.iter().map(|record| record.state).collect()
    }

    pub fn passed_through(&self, state: PipelineState) -> bool {
        self.trace.iter().any(|record| record.state == state)
    }

    pub fn terminal_state(&self) -> Option<PipelineState> {
        self.trace
            .last()
            .map(|record| record.state)
            .filter(PipelineState::is_terminal)
    }

    /// Generate a human-readable replay of the run
    pub fn replay(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Pipeline Trace ===".to_string());
        lines.push(format!("Duration: {:.3}s", self.duration.as_secs_f64()));
        lines.push(format!("Outcome: {}", self.outcome.kind()));

        lines.push(String::new());
        lines.push("--- States ---".to_string());

        for (idx, record) in self.trace.iter().enumerate() {
            lines.push(format!("{}. {}", idx + 1, record.describe()));
        }

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("--- Degradations ---".to_string());
            for warning in &self.warnings {
                lines.push(format!("- {}", warning));
            }
        }

        lines.join("\n")
    }

    /// Generate a detailed explanation including a summary of the outcome
    pub fn explain(&self) -> String {
        let mut lines = vec![self.replay()];

        lines.push(String::new());
        lines.push("--- Outcome ---".to_string());
        match &self.outcome {
            PipelineOutcome::Structured { itinerary } => {
                lines.push(format!("Days: {}", itinerary.days.len()));
                lines.push(format!(
                    "Located activities: {}/{}",
                    itinerary.located_activity_count(),
                    itinerary.activities().count()
                ));
                lines.push(format!("Summary: {}", itinerary.summary));
            }
            PipelineOutcome::Partial { view, .. } | PipelineOutcome::Synthetic { view, .. } => {
                lines.push(format!("Day sections: {}", view.days.len()));
                for day in &view.days {
                    match day.preview(1) {
                        preview if preview.is_empty() => lines.push(format!("   {}", day.title)),
                        preview => lines.push(format!("   {}: {}", day.title, preview)),
                    }
                }
                lines.push(format!("Dining lines: {}", view.restaurants.len()));
            }
        }

        lines.join("\n")
    }
}
