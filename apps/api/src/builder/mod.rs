// Document Builder: ResumeData form model, section-by-section layout, handlers.

pub mod document;
pub mod handlers;
pub mod models;
