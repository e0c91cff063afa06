// In: src/lib.rs

//! Battle Subway Helper
//!
//! Narrows the possible teams of a Battle Subway (B2/W2) Super Set 4/5
//! trainer from the sets already seen, and serves trainer and pool lookups
//! over HTTP and MCP.

// --- MODULE DECLARATIONS ---
pub mod combinations;
pub mod config;
pub mod errors;
pub mod http;
pub mod loader;
pub mod logging;
pub mod mcp_interface;
pub mod repository;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Identifiers and on-disk record shapes.
pub use schema::{
    EntityId, PoolId, PoolRecord, PoolsFile, PoolsIndex, SetRecord, TrainerId, TrainerRecord,
    TrainersFile,
};

// --- From this crate's modules (`src/`) ---

// The combination engine.
pub use combinations::{compute_remaining, Outcome, Strategy, TEAM_SIZE};

// Loading and lookups.
pub use config::{DataPaths, Settings};
pub use loader::{load_repository, load_service};
pub use repository::{IntegrityReport, Pool, Repository};
pub use service::{FilterRequest, FilterResult, LookupService, PoolSummary, SearchResult, TrainerDetail};

// Crate-specific error and result types.
pub use errors::{LoadError, LoadResult, LookupError, LookupResult};
