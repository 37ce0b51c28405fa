// Patch pipeline: schema, keyword heuristics, generator strategies, applicator.
// All text-generation calls go through llm_client.

pub mod applicator;
pub mod generator;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod schema;
