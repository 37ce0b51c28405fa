//! Greedy line wrapping for styled words and plain strings.
//!
//! A word joins the current line while
//! `line_width + space_width + word_width <= max_width`; exact equality fits.
//! A word wider than `max_width` on its own still gets its own line.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::layout::font_metrics::{FontMetrics, FontStyle};
use crate::layout::markup::StyledSegment;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"));

/// A whitespace-free word carrying its segment's style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledWord {
    pub text: String,
    pub style: FontStyle,
    pub link: Option<String>,
}

/// Splits segments on whitespace; every word keeps its parent segment's style.
pub fn split_words(segments: &[StyledSegment]) -> Vec<StyledWord> {
    segments
        .iter()
        .flat_map(|seg| {
            let style = seg.font_style();
            seg.text.split_whitespace().map(move |w| StyledWord {
                text: w.to_string(),
                style,
                link: seg.link.clone(),
            })
        })
        .collect()
}

/// Width of the inter-word gap, always measured in the regular face.
pub fn space_width<M: FontMetrics + ?Sized>(metrics: &M, size: f32) -> f32 {
    metrics.measure(" ", FontStyle::Regular, size)
}

pub fn wrap_words<M: FontMetrics + ?Sized>(
    words: Vec<StyledWord>,
    metrics: &M,
    size: f32,
    max_width: f32,
) -> Vec<Vec<StyledWord>> {
    let space = space_width(metrics, size);
    let mut lines = Vec::new();
    let mut line: Vec<StyledWord> = Vec::new();
    let mut width = 0.0_f32;

    for word in words {
        let word_w = metrics.measure(&word.text, word.style, size);
        if line.is_empty() {
            width = word_w;
            line.push(word);
        } else if width + space + word_w <= max_width {
            width += space + word_w;
            line.push(word);
        } else {
            lines.push(std::mem::take(&mut line));
            width = word_w;
            line.push(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Rewrites `[text](url)` to `text (url)`.
pub fn replace_links(text: &str) -> Cow<'_, str> {
    MARKDOWN_LINK.replace_all(text, "$1 ($2)")
}

/// Wraps unstyled text in the regular face after rewriting markdown links.
pub fn wrap_plain<M: FontMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let cleaned = replace_links(text);
    let words = split_words(&[StyledSegment::plain(cleaned.into_owned())]);
    wrap_words(words, metrics, size, max_width)
        .into_iter()
        .map(|line| {
            line.into_iter()
                .map(|w| w.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
