// Compile-to-PDF: an ordered chain of external LaTeX compilers, each bounded by
// a timeout, run in a throwaway directory.

pub mod backend;
pub mod chain;
pub mod handlers;
