use super::stages::{PipelineState, StageRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Ordered record of the states one pipeline run passed through
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTrace {
    records: Vec<StageRecord>,
}

impl StageTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `state` may be entered next.
    ///
    /// A run starts in an entry state, follows the transition table, and never
    /// revisits a state except `Validating` directly after `Repairing`.
    pub fn accepts(&self, state: PipelineState) -> bool {
        let Some(last) = self.last_state() else {
            return state.is_entry();
        };

        if !last.can_transition_to(state) {
            return false;
        }

        let visits = self.visits(state);
        match state {
            PipelineState::Validating => {
                visits == 0 || (visits == 1 && last == PipelineState::Repairing)
            }
            _ => visits == 0,
        }
    }

    /// Add a state to the trace
    pub fn enter(&mut self, state: PipelineState, detail: Option<String>) {
        let accepted = self.accepts(state);
        if !accepted {
            warn!(
                target: "tripplanner::stages",
                from = self.last_state().map(|s| s.as_str()),
                to = state.as_str(),
                "Unexpected pipeline transition"
            );
        }
        debug_assert!(accepted, "illegal transition to {}", state.as_str());

        let record = StageRecord::new(state, detail);
        info!(target: "tripplanner::stages", "{}", record.describe());
        self.records.push(record);
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn last_state(&self) -> Option<PipelineState> {
        self.records.last().map(|record| record.state)
    }

    pub fn states(&self) -> Vec<PipelineState> {
        self.records.iter().map(|record| record.state).collect()
    }

    pub fn visits(&self, state: PipelineState) -> usize {
        self.records
            .iter()
            .filter(|record| record.state == state)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<StageRecord> {
        self.records
    }
}
