// Interview generation and listing.
// Pipeline: validate request → build prompt → model call → extract questions → persist.
// All model calls go through llm_client, with no direct API calls here.

pub mod covers;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod queries;
