use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::CoreError;

/// Group holding the daily count.
pub const NUM_GROUP: &str = "num";
/// Group holding the place name.
pub const PLACE_GROUP: &str = "place";
/// Optional group holding a reported cumulative count.
pub const ACUM_GROUP: &str = "acum";

/// Count followed by up to two short lowercase tokens and a capitalised
/// place name: `"123 Córdoba"`, `"45 en La Rioja"`.
pub const INLINE_PATTERN: &str = r"(?:^|[^/|\w])(?P<num>\d+)(?P<middle>(?: *[a-z]{0,3}){0,2} *)(?P<place>[A-Z]\w+(?:\s\w+)*)";

/// Parenthesised count, up to five short lowercase tokens, then a place name:
/// `"(7) ab Salta"`.
pub const PARENTHESISED_PATTERN: &str = r"\((?P<num>\d+)\)(?P<middle>(?: *[a-z]{0,3}){0,5} *)(?P<place>[A-Z]\w+(?:\s\w+)*)";

/// Summary-table row: dash, place name, daily count, pipe, cumulative count:
/// `"- Tucumán   88 | 1200"`.
pub const SUMMARY_ROW_PATTERN: &str = r"-\s+(?P<place>[A-Z]\w+(?:\s\w+)*)(?P<middle>\s+)(?P<num>\d+)\s+\|\s+(?P<acum>\d+)";

static DEFAULT_PATTERNS: Lazy<Vec<StructuralPattern>> = Lazy::new(|| {
    [
        ("inline", INLINE_PATTERN),
        ("parenthesised", PARENTHESISED_PATTERN),
        ("summary_row", SUMMARY_ROW_PATTERN),
    ]
    .into_iter()
    .map(|(name, pattern)| StructuralPattern::new(name, pattern).unwrap())
    .collect()
});

/// Built-in layout patterns, in the order they are applied.
pub fn default_patterns() -> &'static [StructuralPattern] {
    &DEFAULT_PATTERNS
}

/// A named text-shape rule locating `(count, place)` pairs in report text.
///
/// The regex must define the `num` and `place` groups; `acum` is optional.
#[derive(Debug, Clone)]
pub struct StructuralPattern {
    name: String,
    regex: Regex,
}

/// Raw fields captured by one pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCapture<'t> {
    pub num: &'t str,
    pub place: &'t str,
    pub acum: Option<&'t str>,
}

impl StructuralPattern {
    pub fn new(name: &str, pattern: &str) -> Result<Self, CoreError> {
        let regex = Regex::new(pattern)?;
        for group in [NUM_GROUP, PLACE_GROUP] {
            if !regex.capture_names().flatten().any(|n| n == group) {
                return Err(CoreError::MissingGroup {
                    pattern: name.to_string(),
                    group,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn captures<'t>(&self, text: &'t str) -> impl Iterator<Item = RawCapture<'t>> {
        self.regex.captures_iter(text).filter_map(raw_capture)
    }
}

fn raw_capture(caps: Captures<'_>) -> Option<RawCapture<'_>> {
    Some(RawCapture {
        num: caps.name(NUM_GROUP)?.as_str(),
        place: caps.name(PLACE_GROUP)?.as_str(),
        acum: caps.name(ACUM_GROUP).map(|m| m.as_str()),
    })
}
