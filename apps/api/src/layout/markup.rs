//! Lightweight markup → styled inline runs.
//!
//! Supported subset: paragraphs, (un)ordered lists, headings (as paragraphs),
//! emphasis, strong, inline code, code blocks, links. Raw HTML is reduced to
//! its text. Nested lists flatten into the enclosing list.
//!
//! Style flows down explicitly: every recursive call receives the
//! `InlineStyle` of its enclosing tags and never reads shared state.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use serde::Serialize;

use crate::layout::font_metrics::FontStyle;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// The atomic unit of inline rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSegment {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub link: Option<String>,
}

impl StyledSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        InlineStyle::default().segment(text)
    }

    pub fn font_style(&self) -> FontStyle {
        FontStyle::from_flags(self.bold, self.italic, self.monospace)
    }
}

/// Inherited inline formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub link: Option<String>,
}

impl InlineStyle {
    fn with_bold(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    fn with_italic(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }

    fn with_monospace(&self) -> Self {
        Self {
            monospace: true,
            ..self.clone()
        }
    }

    fn with_link(&self, url: &str) -> Self {
        Self {
            link: Some(url.to_string()),
            ..self.clone()
        }
    }

    pub fn segment(&self, text: impl Into<String>) -> StyledSegment {
        StyledSegment {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            monospace: self.monospace,
            link: self.link.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupBlock {
    Paragraph(Vec<StyledSegment>),
    /// One entry per item, nested items included in document order.
    List(Vec<Vec<StyledSegment>>),
}

/// Parses markup into paragraph and list blocks. Blocks without visible text are dropped.
pub fn parse_markup(source: &str) -> Vec<MarkupBlock> {
    let mut events = Parser::new(source);
    let mut blocks = Vec::new();

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::List(_)) => {
                let mut items = Vec::new();
                collect_list(&mut events, &mut items);
                items.retain(|segs| has_text(segs));
                if !items.is_empty() {
                    blocks.push(MarkupBlock::List(items));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                let mut segs = Vec::new();
                collect_inline(&mut events, &InlineStyle::default().with_monospace(), &mut segs);
                push_paragraph(&mut blocks, segs);
            }
            Event::Start(Tag::Paragraph | Tag::Heading { .. } | Tag::HtmlBlock) => {
                let mut segs = Vec::new();
                collect_inline(&mut events, &InlineStyle::default(), &mut segs);
                push_paragraph(&mut blocks, segs);
            }
            _ => {}
        }
    }

    blocks
}

fn push_paragraph(blocks: &mut Vec<MarkupBlock>, segs: Vec<StyledSegment>) {
    if has_text(&segs) {
        blocks.push(MarkupBlock::Paragraph(segs));
    }
}

fn has_text(segs: &[StyledSegment]) -> bool {
    segs.iter().any(|s| !s.text.trim().is_empty())
}

/// Consumes events up to and including the `End` matching an already-consumed `Start`.
fn collect_inline<'a, I>(events: &mut I, style: &InlineStyle, out: &mut Vec<StyledSegment>)
where
    I: Iterator<Item = Event<'a>>,
{
    while let Some(event) = events.next() {
        if let Event::End(_) = event {
            return;
        }
        push_inline(event, events, style, out);
    }
}

fn push_inline<'a, I>(event: Event<'a>, events: &mut I, style: &InlineStyle, out: &mut Vec<StyledSegment>)
where
    I: Iterator<Item = Event<'a>>,
{
    match event {
        Event::Text(text) => out.push(style.segment(text.to_string())),
        Event::Code(code) => out.push(style.with_monospace().segment(code.to_string())),
        Event::SoftBreak | Event::HardBreak => out.push(style.segment(" ")),
        Event::Html(html) | Event::InlineHtml(html) => {
            let text = HTML_TAG.replace_all(&html, "");
            if !text.trim().is_empty() {
                out.push(style.segment(text.into_owned()));
            }
        }
        Event::Start(Tag::Emphasis) => collect_inline(events, &style.with_italic(), out),
        Event::Start(Tag::Strong) => collect_inline(events, &style.with_bold(), out),
        Event::Start(Tag::Link { dest_url, .. }) => {
            let linked = style.with_link(&dest_url);
            collect_inline(events, &linked, out);
            out.push(linked.segment(format!(" ({dest_url})")));
        }
        Event::Start(_) => collect_inline(events, style, out),
        _ => {}
    }
}

/// Consumes a list body. Nested list items are appended after their parent.
fn collect_list<'a, I>(events: &mut I, items: &mut Vec<Vec<StyledSegment>>)
where
    I: Iterator<Item = Event<'a>>,
{
    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Item) => collect_item(events, items),
            Event::End(_) => return,
            _ => {}
        }
    }
}

fn collect_item<'a, I>(events: &mut I, items: &mut Vec<Vec<StyledSegment>>)
where
    I: Iterator<Item = Event<'a>>,
{
    let index = items.len();
    items.push(Vec::new());
    let plain = InlineStyle::default();

    while let Some(event) = events.next() {
        match event {
            Event::End(_) => return,
            Event::Start(Tag::List(_)) => collect_list(events, items),
            Event::Start(Tag::Paragraph) => {
                if !items[index].is_empty() {
                    items[index].push(plain.segment(" "));
                }
                collect_inline(events, &plain, &mut items[index]);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                collect_inline(events, &plain.with_monospace(), &mut items[index]);
            }
            other => push_inline(other, events, &plain, &mut items[index]),
        }
    }
}
