//! Infrastructure layer for Scoutline.
//!
//! Contains implementations of the trait seams defined in `scoutline-core`:
//! SQLite storage with split read/write pools, and the OpenAI-compatible
//! embedding API client.

pub mod embed;
pub mod sqlite;
