//! Layout engine: turns content items into positioned drawing instructions.
//!
//! Pagination is coarse: only `ContentItem::KeepTogether` checks the bottom
//! margin, so callers place one before each section and entry. Lines inside an
//! entry are never split across pages.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::layout::cursor::{advance, PageSetup, RenderCursor};
use crate::layout::font_metrics::{FontMetrics, FontStyle};
use crate::layout::markup::{parse_markup, MarkupBlock, StyledSegment};
use crate::layout::wrap::{space_width, split_words, wrap_plain, wrap_words};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(String),

    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    pub const BLACK: Rgb = Rgb::gray(0.0);
    pub const BODY: Rgb = Rgb::gray(0.1);
    pub const MUTED: Rgb = Rgb::gray(0.2);
    pub const META: Rgb = Rgb::gray(0.3);
    pub const HAIRLINE: Rgb = Rgb::gray(0.85);
    pub const LINK: Rgb = Rgb {
        r: 0.1,
        g: 0.3,
        b: 0.6,
    };
}

/// One positioned drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        page: usize,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
        text: String,
    },
    Rule {
        page: usize,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness: f32,
        color: Rgb,
    },
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text { page, .. } | DrawOp::Rule { page, .. } => *page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutDocument {
    pub setup: PageSetup,
    pub page_count: usize,
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
impl LaidOutDocument {
    /// All drawn text, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

/// Input to `render_content`. Offsets are relative to the left margin; `inset`
/// is subtracted from the full content width to get the wrap width.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    /// Single centred line, then move down `gap`.
    Centered {
        text: String,
        size: f32,
        color: Rgb,
        gap: f32,
    },
    /// Full-width rule at the baseline, then move down `gap`.
    Rule { thickness: f32, color: Rgb, gap: f32 },
    /// Upper-cased heading with a hairline underneath.
    SectionTitle(String),
    /// Left text with an optional second field flush to the right margin.
    Row {
        left: String,
        left_size: f32,
        right: Option<String>,
        right_size: f32,
    },
    /// Single unwrapped line.
    Line {
        text: String,
        indent: f32,
        size: f32,
        color: Rgb,
    },
    /// Plain text wrapped in the regular face; markdown links are rewritten.
    Wrapped {
        text: String,
        indent: f32,
        inset: f32,
        size: f32,
        color: Rgb,
    },
    /// Markup rendered as paragraphs and bulleted items at body size.
    Markup {
        source: String,
        indent: f32,
        inset: f32,
    },
    Gap(f32),
    /// Page-break check: a new page when fewer than this many points remain.
    KeepTogether(f32),
}

pub const BODY_SIZE: f32 = 10.0;
const SECTION_TITLE_SIZE: f32 = 10.0;
const SECTION_RULE_GAP: f32 = 12.0;
const BULLET: &str = "\u{2022}";
const BULLET_INDENT: f32 = 8.0;
const ITEM_INDENT: f32 = 18.0;
const ITEM_INSET: f32 = 36.0;
const LINK_UNDERLINE_DROP: f32 = 2.0;
const LINK_UNDERLINE_THICKNESS: f32 = 0.5;

/// Lays out `items` top to bottom starting on page one.
pub fn render_content<M: FontMetrics + ?Sized>(
    setup: PageSetup,
    metrics: &M,
    items: &[ContentItem],
) -> Result<LaidOutDocument, RenderError> {
    if !(setup.width > 2.0 * setup.margin && setup.height > setup.margin + setup.min_bottom) {
        return Err(RenderError::Layout(format!(
            "page {}x{} leaves no room inside margin {}",
            setup.width, setup.height, setup.margin
        )));
    }

    let mut canvas = Canvas {
        metrics,
        ops: Vec::new(),
    };
    let mut cursor = RenderCursor::start(setup);

    for item in items {
        cursor = canvas.item(cursor, item)?;
    }

    let page_count = cursor.page + 1;
    debug!(page_count, ops = canvas.ops.len(), "Layout complete");

    Ok(LaidOutDocument {
        setup,
        page_count,
        ops: canvas.ops,
    })
}

struct Canvas<'m, M: ?Sized> {
    metrics: &'m M,
    ops: Vec<DrawOp>,
}

impl<M: FontMetrics + ?Sized> Canvas<'_, M> {
    fn item(&mut self, cursor: RenderCursor, item: &ContentItem) -> Result<RenderCursor, RenderError> {
        let setup = cursor.setup;
        let left = setup.left();

        let next = match item {
            ContentItem::Centered {
                text,
                size,
                color,
                gap,
            } => {
                check_size(*size)?;
                let w = self.metrics.measure(text, FontStyle::Regular, *size);
                self.text(cursor, (setup.width - w) / 2.0, text, *size, FontStyle::Regular, *color);
                cursor.down(*gap)
            }
            ContentItem::Rule {
                thickness,
                color,
                gap,
            } => {
                self.rule(cursor, left, setup.right(), cursor.y, *thickness, *color);
                cursor.down(*gap)
            }
            ContentItem::SectionTitle(title) => {
                self.text(
                    cursor,
                    left,
                    &title.to_uppercase(),
                    SECTION_TITLE_SIZE,
                    FontStyle::Regular,
                    Rgb::BLACK,
                );
                let below = cursor.next_line();
                self.rule(below, left, setup.right(), below.y, 0.5, Rgb::HAIRLINE);
                below.down(SECTION_RULE_GAP)
            }
            ContentItem::Row {
                left: left_text,
                left_size,
                right,
                right_size,
            } => {
                check_size(*left_size)?;
                self.text(cursor, left, left_text, *left_size, FontStyle::Regular, Rgb::BLACK);
                if let Some(right_text) = right.as_deref().filter(|t| !t.is_empty()) {
                    check_size(*right_size)?;
                    let w = self.metrics.measure(right_text, FontStyle::Regular, *right_size);
                    self.text(
                        cursor,
                        setup.right() - w,
                        right_text,
                        *right_size,
                        FontStyle::Regular,
                        Rgb::MUTED,
                    );
                }
                cursor.next_line()
            }
            ContentItem::Line {
                text,
                indent,
                size,
                color,
            } => {
                check_size(*size)?;
                self.text(cursor, left + indent, text, *size, FontStyle::Regular, *color);
                cursor.next_line()
            }
            ContentItem::Wrapped {
                text,
                indent,
                inset,
                size,
                color,
            } => {
                check_size(*size)?;
                let max_width = setup.content_width() - inset;
                wrap_plain(text, self.metrics, *size, max_width)
                    .into_iter()
                    .fold(cursor, |c, line| {
                        self.text(c, left + indent, &line, *size, FontStyle::Regular, *color);
                        c.next_line()
                    })
            }
            ContentItem::Markup {
                source,
                indent,
                inset,
            } => self.markup(cursor, source, *indent, *inset),
            ContentItem::Gap(dy) => cursor.down(*dy),
            ContentItem::KeepTogether(needed) => advance(cursor, *needed),
        };

        if !next.y.is_finite() {
            return Err(RenderError::Layout("cursor left the page".to_string()));
        }
        Ok(next)
    }

    fn markup(&mut self, cursor: RenderCursor, source: &str, indent: f32, inset: f32) -> RenderCursor {
        let setup = cursor.setup;
        let left = setup.left();
        let mut cursor = cursor;

        for block in parse_markup(source) {
            match block {
                MarkupBlock::Paragraph(segments) => {
                    cursor = self.segments(
                        cursor,
                        &segments,
                        left + indent,
                        setup.content_width() - inset,
                    );
                }
                MarkupBlock::List(items) => {
                    for segments in items {
                        self.text(
                            cursor,
                            left + BULLET_INDENT,
                            BULLET,
                            BODY_SIZE,
                            FontStyle::Regular,
                            Rgb::BLACK,
                        );
                        cursor = self.segments(
                            cursor,
                            &segments,
                            left + ITEM_INDENT,
                            setup.content_width() - ITEM_INSET,
                        );
                    }
                }
            }
        }
        cursor
    }

    /// Wraps styled segments and draws them word by word.
    fn segments(
        &mut self,
        cursor: RenderCursor,
        segments: &[StyledSegment],
        x_start: f32,
        max_width: f32,
    ) -> RenderCursor {
        let lines = wrap_words(split_words(segments), self.metrics, BODY_SIZE, max_width);
        let space = space_width(self.metrics, BODY_SIZE);
        let mut cursor = cursor;

        for line in lines {
            let mut x = x_start;
            for word in &line {
                let color = if word.link.is_some() { Rgb::LINK } else { Rgb::BODY };
                let w = self.metrics.measure(&word.text, word.style, BODY_SIZE);
                self.text(cursor, x, &word.text, BODY_SIZE, word.style, color);
                if word.link.is_some() {
                    let underline_y = cursor.y - LINK_UNDERLINE_DROP;
                    self.rule(cursor, x, x + w, underline_y, LINK_UNDERLINE_THICKNESS, color);
                }
                x += w + space;
            }
            cursor = cursor.next_line();
        }
        cursor
    }

    fn text(&mut self, cursor: RenderCursor, x: f32, text: &str, size: f32, style: FontStyle, color: Rgb) {
        if text.trim().is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            page: cursor.page,
            x,
            y: cursor.y,
            size,
            style,
            color,
            text: text.to_string(),
        });
    }

    fn rule(&mut self, cursor: RenderCursor, x1: f32, x2: f32, y: f32, thickness: f32, color: Rgb) {
        self.ops.push(DrawOp::Rule {
            page: cursor.page,
            x1,
            y1: y,
            x2,
            y2: y,
            thickness,
            color,
        });
    }
}

fn check_size(size: f32) -> Result<(), RenderError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(RenderError::Layout(format!("invalid font size {size}")))
    }
}
