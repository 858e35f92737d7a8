use serde::{Deserialize, Serialize};

/// States of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    /// Raw model text was handed to the pipeline
    RawTextReceived,
    /// Looking for a JSON block and parsing it strictly
    Extracting,
    /// Shape check and typed conversion
    Validating,
    /// Filling in coordinates from the gazetteer
    Enriching,
    /// Terminal: an itinerary was produced
    StructuredSuccess,
    /// Text transforms and a single re-parse
    Repairing,
    /// Cutting prose into day sections
    Segmenting,
    /// Terminal: only a prose view could be produced
    PartialView,
    /// No raw text was available; building the offline itinerary
    MockGenerating,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::RawTextReceived => "RAW_TEXT_RECEIVED",
            PipelineState::Extracting => "EXTRACTING",
            PipelineState::Validating => "VALIDATING",
            PipelineState::Enriching => "ENRICHING",
            PipelineState::StructuredSuccess => "STRUCTURED_SUCCESS",
            PipelineState::Repairing => "REPAIRING",
            PipelineState::Segmenting => "SEGMENTING",
            PipelineState::PartialView => "PARTIAL_VIEW",
            PipelineState::MockGenerating => "MOCK_GENERATING",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::StructuredSuccess | PipelineState::PartialView
        )
    }

    /// States a run may start in.
    pub fn is_entry(&self) -> bool {
        matches!(
            self,
            PipelineState::RawTextReceived | PipelineState::MockGenerating
        )
    }

    /// Whether `next` may directly follow this state.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (*self, next),
            (RawTextReceived, Extracting)
                | (Extracting, Validating)
                | (Extracting, Repairing)
                | (Validating, Enriching)
                | (Validating, Repairing)
                | (Validating, Segmenting)
                | (Repairing, Validating)
                | (Repairing, Segmenting)
                | (Enriching, StructuredSuccess)
                | (Segmenting, PartialView)
                | (MockGenerating, StructuredSuccess)
        )
    }

    fn icon(&self) -> &'static str {
        match self {
            PipelineState::RawTextReceived => "📥",
            PipelineState::Extracting => "🔎",
            PipelineState::Validating => "🧪",
            PipelineState::Enriching => "📍",
            PipelineState::StructuredSuccess => "✅",
            PipelineState::Repairing => "🔧",
            PipelineState::Segmenting => "✂",
            PipelineState::PartialView => "📄",
            PipelineState::MockGenerating => "🎲",
        }
    }
}

/// A single entry in a run's state trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub state: PipelineState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StageRecord {
    pub fn new(state: PipelineState, detail: Option<String>) -> Self {
        Self { state, detail }
    }

    /// Get a human-readable description of the step
    pub fn describe(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{} {}: {}", self.state.icon(), self.state.as_str(), detail),
            None => format!("{} {}", self.state.icon(), self.state.as_str()),
        }
    }
}
