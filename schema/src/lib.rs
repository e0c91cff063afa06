// Battle Subway Helper Schema - Shared record definitions
// This crate describes the JSON files produced by the offline data pipeline
// (trainers, deduplicated pools, pool index) and the identifier types used to
// key them, so the serving crate and its tests agree on one shape.

// Re-export the main types
pub use ids::*;
pub use records::*;

pub mod ids;
pub mod records;
