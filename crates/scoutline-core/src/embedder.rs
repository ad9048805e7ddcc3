//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding profile text into vectors.
//! Implementations (e.g., the OpenAI-compatible HTTP client) live in
//! scoutline-infra.

use scoutline_types::error::EmbedError;

/// Trait for converting one text into an embedding vector.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition). The
/// pipeline embeds one item per call so that a failure is scoped to that
/// item alone.
pub trait Embedder: Send + Sync {
    /// Embed a single text into a vector.
    ///
    /// The returned vector is guaranteed non-empty: implementations must
    /// map an empty provider response to [`EmbedError::EmptyEmbedding`].
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbedError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;

    /// Advertised dimensionality of the output vectors. Advisory only:
    /// the pipeline does not validate vector length against it.
    fn dimension(&self) -> usize;
}
