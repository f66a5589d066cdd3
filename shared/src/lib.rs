//! Shared types and local data stores for the GeoCrop platform
//!
//! This crate contains the client-side data core used by the browser (via WASM)
//! and the native `geocrop` tool: farm boundary geometry, the storage port, and
//! the stores persisted behind it.

pub mod alerts;
pub mod export;
pub mod farms;
pub mod geometry;
pub mod history;
pub mod models;
pub mod progress;
pub mod reports;
pub mod settings;
pub mod soil;
pub mod storage;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
