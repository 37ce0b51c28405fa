// Template Region Model: named, marker-delimited regions inside a LaTeX document.
// Markers are LaTeX comments, so they survive compilation untouched:
//   %<BLOCK id="summary">
//   ...
//   %</BLOCK>

pub mod regions;

pub use regions::{end_marker, extract_regions, start_marker, unclosed_block_ids, Region};
