// Layout/Render Engine: font metrics, markup → styled runs, greedy wrapping,
// cursor-driven pagination, PDF output.
// CPU-bound rendering must run inside tokio::task::spawn_blocking.

pub mod cursor;
pub mod engine;
pub mod font_metrics;
pub mod markup;
pub mod pdf;
pub mod wrap;

// Re-export the public API consumed by the builder and handlers.
pub use cursor::PageSetup;
pub use engine::{render_content, ContentItem, LaidOutDocument, RenderError, Rgb};
pub use font_metrics::StandardFonts;
pub use pdf::write_pdf;
