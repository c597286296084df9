// Interview feedback: structured evaluation of a transcript, persisted per
// (interview, user). One record per pair by convention only.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod queries;
