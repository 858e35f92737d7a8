use serde::{Deserialize, Serialize};

/// One day section cut out of prose output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySection {
    /// Header line, e.g. "Day 2: Explore"
    pub title: String,
    /// Remaining text of the section
    pub content: String,
}

impl DaySection {
    /// First `lines` lines of the content joined with spaces, for collapsed display.
    pub fn preview(&self, lines: usize) -> String {
        let mut all = self.content.lines();
        let head: Vec<&str> = all.by_ref().take(lines).collect();
        let mut preview = head.join(" ");
        if all.next().is_some() {
            preview.push_str("...");
        }
        preview
    }
}

/// Best-effort view of an itinerary that only exists as prose.
///
/// `summary` and `transport` are `None` when no matching section was found,
/// which is different from a section that was found but is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub days: Vec<DaySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    pub restaurants: Vec<String>,
}

impl StructuredView {
    /// True when no day headers were found and callers should show the raw text instead.
    pub fn has_no_days(&self) -> bool {
        self.days.is_empty()
    }
}
