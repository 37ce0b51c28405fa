// Job tracker: board records, JSON-file store, handlers.

pub mod handlers;
pub mod models;
pub mod store;
