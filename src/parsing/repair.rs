//! Best-effort repair of near-valid JSON.
//!
//! A fixed table of text transforms runs left to right, then parsing is
//! retried exactly once. There is no looping and no semantic understanding.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{PlannerError, Result};

/// A pure text rewrite applied during repair.
pub type Transform = fn(&str) -> String;

/// Transforms in application order.
pub const TRANSFORMS: &[(&str, Transform)] = &[
    ("strip_code_fences", strip_code_fences),
    ("remove_trailing_commas", remove_trailing_commas),
    ("quote_single_quoted", quote_single_quoted),
];

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid fence regex"));

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"));

static SINGLE_QUOTED_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'(\s*:)").expect("valid key regex"));

static SINGLE_QUOTED_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*'([^']*)'").expect("valid value regex"));

pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_RE.replace_all(text, "${1}").into_owned()
}

/// `'name':` becomes `"name":` and `: 'value'` becomes `: "value"`.
pub fn quote_single_quoted(text: &str) -> String {
    let keys = SINGLE_QUOTED_KEY_RE.replace_all(text, "\"${1}\"${2}");
    SINGLE_QUOTED_VALUE_RE
        .replace_all(&keys, ": \"${1}\"")
        .into_owned()
}

/// Output of a successful repair.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub value: Value,
    /// Names of the transforms that changed the text
    pub applied: Vec<&'static str>,
}

/// Run every transform in order and report which ones changed the text.
pub fn apply_transforms(text: &str) -> (String, Vec<&'static str>) {
    let mut current = text.to_string();
    let mut applied = Vec::new();

    for (name, transform) in TRANSFORMS {
        let next = transform(&current);
        if next != current {
            debug!(
                target: "tripplanner::repair",
                transform = name,
                before = current.len(),
                after = next.len(),
                "Repair transform changed candidate"
            );
            applied.push(*name);
            current = next;
        }
    }

    (current, applied)
}

/// Repair `block` and parse it once.
pub fn repair(block: &str) -> Result<Repaired> {
    let (repaired, applied) = apply_transforms(block);
    let value = serde_json::from_str::<Value>(&repaired)
        .map_err(|err| PlannerError::Repair(err.to_string()))?;
    Ok(Repaired { value, applied })
}
