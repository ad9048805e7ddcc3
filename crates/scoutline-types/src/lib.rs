//! Shared domain types for Scoutline.
//!
//! This crate contains the core domain types used across the enrichment
//! pipeline: player profiles, persisted embeddings, run reports, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod embedding;
pub mod error;
pub mod player;
pub mod report;
