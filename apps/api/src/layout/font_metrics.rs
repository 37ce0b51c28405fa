//! Static font-metric tables for the standard PDF base fonts.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Adobe AFM files for Helvetica, Helvetica-Bold and Courier. The oblique faces
//! share their upright face's widths. Tables cover ASCII 0x20..=0x7E
//! (95 printable characters), index = (char as usize) - 32, plus a short list
//! of WinAnsi extras (dashes, bullet, curly quotes, ellipsis).

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font styles
// ────────────────────────────────────────────────────────────────────────────

/// The five faces a rendered document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
    Mono,
}

impl FontStyle {
    pub const ALL: [FontStyle; 5] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
        FontStyle::Mono,
    ];

    /// Precedence: bold+italic, bold, italic, monospace, regular.
    pub fn from_flags(bold: bool, italic: bool, monospace: bool) -> Self {
        match (bold, italic, monospace) {
            (true, true, _) => FontStyle::BoldItalic,
            (true, false, _) => FontStyle::Bold,
            (false, true, _) => FontStyle::Italic,
            (false, false, true) => FontStyle::Mono,
            (false, false, false) => FontStyle::Regular,
        }
    }

    /// PostScript name of the standard font backing this style.
    pub fn base_font(self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
            FontStyle::BoldItalic => "Helvetica-BoldOblique",
            FontStyle::Mono => "Courier",
        }
    }

    /// Name used in page resource dictionaries.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
            FontStyle::BoldItalic => "F4",
            FontStyle::Mono => "F5",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement seam
// ────────────────────────────────────────────────────────────────────────────

/// Measures rendered text width in points.
pub trait FontMetrics: Send + Sync {
    fn measure(&self, text: &str, style: FontStyle, size: f32) -> f32;
}

/// Metrics for the built-in standard fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFonts;

impl FontMetrics for StandardFonts {
    fn measure(&self, text: &str, style: FontStyle, size: f32) -> f32 {
        get_metrics(style).measure_str(text) * size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    extras: &'static [(char, f32)],
    /// Fallback for characters outside the table.
    pub average_char_width: f32,
}

impl FontMetricTable {
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extras
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|(_, w)| *w)
            .unwrap_or(self.average_char_width)
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_EXTRAS: [(char, f32); 8] = [
    ('\u{2013}', 0.556), // en dash
    ('\u{2014}', 1.000), // em dash
    ('\u{2022}', 0.350), // bullet
    ('\u{2018}', 0.222),
    ('\u{2019}', 0.222),
    ('\u{201C}', 0.333),
    ('\u{201D}', 0.333),
    ('\u{2026}', 1.000), // ellipsis
];

static HELVETICA_BOLD_EXTRAS: [(char, f32); 8] = [
    ('\u{2013}', 0.556),
    ('\u{2014}', 1.000),
    ('\u{2022}', 0.350),
    ('\u{2018}', 0.278),
    ('\u{2019}', 0.278),
    ('\u{201C}', 0.500),
    ('\u{201D}', 0.500),
    ('\u{2026}', 1.000),
];

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    extras: &HELVETICA_EXTRAS,
    average_char_width: 0.52,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    extras: &HELVETICA_BOLD_EXTRAS,
    average_char_width: 0.55,
};

/// Courier is monospaced: every glyph is 0.6 em.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.6; 95],
    extras: &[],
    average_char_width: 0.6,
};

/// Returns the static metric table for a given style.
pub fn get_metrics(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Regular | FontStyle::Italic => &HELVETICA_TABLE,
        FontStyle::Bold | FontStyle::BoldItalic => &HELVETICA_BOLD_TABLE,
        FontStyle::Mono => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
