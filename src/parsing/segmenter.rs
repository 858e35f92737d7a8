//! Heuristic segmentation of prose itineraries.
//!
//! Used when no JSON could be recovered from the model output, and to
//! display the prose produced by the mock generator.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::types::{DaySection, StructuredView};

pub const SUMMARY_KEYWORDS: &[&str] = &["summary", "overview", "about this trip"];
pub const TRANSPORT_KEYWORDS: &[&str] = &["transport", "transportation", "getting around"];
pub const DINING_KEYWORDS: &[&str] = &["restaurant", "dinner", "breakfast", "lunch", "cafe"];

/// Maximum number of dining lines kept in a view.
pub const MAX_DINING_LINES: usize = 8;

const PARAGRAPH_BREAK: &str = "\n\n";

// A Markdown heading prefix on the same line is pulled into the match so the
// previous section does not end with a dangling `###`.
static DAY_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^[ \t]*#+[ \t]*)?day\s*\d+[:\-.]?").expect("valid day header regex")
});

static DINING_RE: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(DINING_KEYWORDS).expect("valid dining regex")
});

fn keyword_regex(keywords: &[&str]) -> Option<Regex> {
    let pattern = keywords
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// Split prose into day sections at every `Day N` header.
///
/// Returns an empty list when the text has no header at all. Text before the
/// first header becomes its own section unless it is blank.
pub fn split_days(text: &str) -> Vec<DaySection> {
    let starts: Vec<usize> = DAY_HEADER_RE.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return Vec::new();
    }

    let mut bounds = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 {
        bounds.push(0);
    }
    bounds.extend(starts.iter().copied());

    bounds
        .iter()
        .enumerate()
        .map(|(index, &start)| {
            let end = bounds.get(index + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .filter(|segment| !segment.trim().is_empty())
        .map(section_from_segment)
        .collect()
}

fn section_from_segment(segment: &str) -> DaySection {
    let segment = segment.trim();
    let (first_line, rest) = segment.split_once('\n').unwrap_or((segment, ""));
    let title = match first_line.trim().trim_start_matches('#').trim_start() {
        "" => "Day".to_string(),
        line => line.to_string(),
    };

    DaySection {
        title,
        content: rest.trim().to_string(),
    }
}

/// Paragraph starting at the earliest case-insensitive keyword match.
///
/// `None` when no keyword occurs anywhere in the text.
pub fn extract_section(text: &str, keywords: &[&str]) -> Option<String> {
    let found = keyword_regex(keywords)?.find(text)?;
    let tail = &text[found.start()..];
    let paragraph = tail
        .find(PARAGRAPH_BREAK)
        .map_or(tail, |end| &tail[..end]);
    Some(paragraph.trim().to_string())
}

/// Trimmed lines that mention a meal or a place to eat, in order.
pub fn extract_dining_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| DINING_RE.is_match(line))
        .take(MAX_DINING_LINES)
        .map(str::to_string)
        .collect()
}

/// Text up to the first blank line, trimmed; `None` when that is empty.
pub fn first_paragraph(text: &str) -> Option<String> {
    let paragraph = text.split(PARAGRAPH_BREAK).next().unwrap_or("").trim();
    (!paragraph.is_empty()).then(|| paragraph.to_string())
}

/// Build the best-effort view of a prose itinerary.
pub fn segment(text: &str) -> StructuredView {
    StructuredView {
        summary: extract_section(text, SUMMARY_KEYWORDS).or_else(|| first_paragraph(text)),
        days: split_days(text),
        transport: extract_section(text, TRANSPORT_KEYWORDS),
        restaurants: extract_dining_lines(text),
    }
}
