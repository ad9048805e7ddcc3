//! Business logic for the Scoutline enrichment pipeline.
//!
//! This crate holds everything that does not touch a socket or a disk:
//! the profile-to-text normalizer, the repository and embedder trait
//! seams (implemented in scoutline-infra), and the batch orchestrator
//! that drives a run end to end.

pub mod embedder;
pub mod normalize;
pub mod pipeline;
pub mod repository;
