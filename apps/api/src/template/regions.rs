//! Region extraction: finds every `%<BLOCK id="...">` … `%</BLOCK>` pair in a document.
//!
//! Matching is non-greedy and left to right: the first end marker after a start
//! marker closes it, and scanning resumes after that end marker. Regions never
//! nest and never overlap.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const END_MARKER: &str = "%</BLOCK>";

static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)%<BLOCK id="([^"]+)">(.*?)%</BLOCK>"#).expect("region pattern is valid")
});

static START_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"%<BLOCK id="([^"]+)">"#).expect("start marker pattern is valid"));

/// A replaceable region of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    /// Interior content, trimmed as a whole.
    pub raw_content: String,
    /// `raw_content` split on line breaks, trailing whitespace stripped per line.
    pub lines: Vec<String>,
}

/// The start marker for `id`, exactly as it must appear in the document.
pub fn start_marker(id: &str) -> String {
    format!("%<BLOCK id=\"{id}\">")
}

/// The end marker shared by every region.
pub fn end_marker() -> &'static str {
    END_MARKER
}

/// Extracts all regions in document order. Zero regions is a valid result.
/// A repeated id keeps only its first region, the one the applicator would patch.
pub fn extract_regions(document: &str) -> Vec<Region> {
    let mut seen = HashSet::new();
    REGION_RE
        .captures_iter(document)
        .map(|caps| {
            let id = caps[1].to_string();
            let raw_content = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .unwrap_or_default()
                .to_string();
            let lines = split_lines(&raw_content);
            Region {
                id,
                raw_content,
                lines,
            }
        })
        .filter(|region| seen.insert(region.id.clone()))
        .collect()
}

/// Ids of start markers that do not open a region, in document order: either
/// no end marker follows, or the marker sits inside an earlier region.
/// Judged per marker, so a repeated id is reported even when its first use closed.
pub fn unclosed_block_ids(document: &str) -> Vec<String> {
    let opening: HashSet<usize> = REGION_RE
        .find_iter(document)
        .map(|m| m.start())
        .collect();
    START_MARKER_RE
        .captures_iter(document)
        .filter(|caps| caps.get(0).is_some_and(|m| !opening.contains(&m.start())))
        .map(|caps| caps[1].to_string())
        .collect()
}

fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content
        .split('\n')
        .map(|line| line.trim_end().to_string())
        .collect()
}
