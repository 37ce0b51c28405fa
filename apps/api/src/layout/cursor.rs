//! Page geometry and the render cursor.
//!
//! `RenderCursor` is a plain value: every drawing step takes one and hands
//! back the next. Coordinates are PDF points with the origin at the bottom left.

use serde::Serialize;

/// Fixed page format used for every rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// A new page starts before content that would drop below this line.
    pub min_bottom: f32,
    pub line_height: f32,
}

impl PageSetup {
    /// A4 portrait, 48pt margins, 14pt leading.
    pub const A4: PageSetup = PageSetup {
        width: 595.28,
        height: 841.89,
        margin: 48.0,
        min_bottom: 72.0,
        line_height: 14.0,
    };

    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.right() - self.left()
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::A4
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCursor {
    /// Zero-based page index.
    pub page: usize,
    /// Current baseline.
    pub y: f32,
    pub setup: PageSetup,
}

impl RenderCursor {
    /// Top of the first page.
    pub fn start(setup: PageSetup) -> Self {
        Self {
            page: 0,
            y: setup.top(),
            setup,
        }
    }

    /// Moves the baseline down by `dy` on the same page.
    pub fn down(self, dy: f32) -> Self {
        Self {
            y: self.y - dy,
            ..self
        }
    }

    /// Top of the next page.
    pub fn next_page(self) -> Self {
        Self {
            page: self.page + 1,
            y: self.setup.top(),
            ..self
        }
    }

    /// Next line on the same page.
    pub fn next_line(self) -> Self {
        self.down(self.setup.line_height)
    }
}

/// Starts a new page when `needed` more points would cross the bottom margin.
pub fn advance(cursor: RenderCursor, needed: f32) -> RenderCursor {
    if cursor.y - needed < cursor.setup.min_bottom {
        cursor.next_page()
    } else {
        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_top_margin() {
        let cursor = RenderCursor::start(PageSetup::A4);
        assert_eq!(cursor.page, 0);
        assert!((cursor.y - (841.89 - 48.0)).abs() < 1e-3);
    }

    #[test]
    fn test_advance_keeps_page_when_space_remains() {
        let cursor = RenderCursor::start(PageSetup::A4).down(100.0);
        assert_eq!(advance(cursor, 28.0), cursor);
    }

    #[test]
    fn test_advance_breaks_page_below_bottom_margin() {
        let mut cursor = RenderCursor::start(PageSetup::A4);
        cursor.y = 80.0;
        let next = advance(cursor, 14.0);
        assert_eq!(next.page, 1);
        assert!((next.y - PageSetup::A4.top()).abs() < 1e-3);
    }

    #[test]
    fn test_advance_boundary_is_inclusive() {
        let mut cursor = RenderCursor::start(PageSetup::A4);
        cursor.y = 86.0;
        // 86 - 14 == 72 exactly: still fits
        assert_eq!(advance(cursor, 14.0).page, 0);
    }

    #[test]
    fn test_a4_geometry() {
        let setup = PageSetup::A4;
        assert!((setup.content_width() - (595.28 - 96.0)).abs() < 1e-3);
        assert_eq!(setup.left(), 48.0);
    }
}
