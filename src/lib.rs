//! Prompt Weaver: seeded prompt composition for image-generation models.
//!
//! Builds a prompt from categorized vocabulary pools against a fixed
//! template, then splits it into a default stream and two encoder-region
//! streams for models that take separate text-encoder inputs.

pub mod core;
pub mod schema;
