//! Locating a JSON object inside free-form model output.
//!
//! The scan counts braces only. It does not track string literals, so a `}`
//! inside a quoted value can close the block early. Callers fall through to
//! repair and segmentation when that happens.

use crate::error::{PlannerError, Result};

/// How a candidate block was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// First `{` to its depth-zero `}`
    Balanced,
    /// First `{` to the last `}` in the text
    Greedy,
}

impl ExtractionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::Balanced => "balanced",
            ExtractionStrategy::Greedy => "greedy",
        }
    }
}

/// A candidate JSON span borrowed from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub text: &'a str,
    pub start: usize,
    pub strategy: ExtractionStrategy,
}

/// Returns the span from the first `{` through its matching `}`.
///
/// `None` when the text has no `{` or the braces never balance.
pub fn extract_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth: i64 = 0;

    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => continue,
        }
        if depth == 0 {
            let end = start + offset + ch.len_utf8();
            return Some(&text[start..end]);
        }
    }

    None
}

fn greedy_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Find the best candidate block, trying the balanced scan before the greedy span.
pub fn locate_candidate(text: &str) -> Result<Candidate<'_>> {
    let start = text.find('{').ok_or_else(|| {
        PlannerError::Extraction("response contains no opening brace".to_string())
    })?;

    if let Some(block) = extract_block(text) {
        return Ok(Candidate {
            text: block,
            start,
            strategy: ExtractionStrategy::Balanced,
        });
    }

    greedy_block(text)
        .map(|block| Candidate {
            text: block,
            start,
            strategy: ExtractionStrategy::Greedy,
        })
        .ok_or_else(|| {
            PlannerError::Extraction(format!(
                "braces never balance after offset {}",
                start
            ))
        })
}
