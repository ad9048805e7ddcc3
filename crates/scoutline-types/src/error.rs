use thiserror::Error;

/// Errors from repository operations (used by trait definitions in
/// scoutline-core).
///
/// Repository errors are fatal to a run when raised by the record
/// selector; the orchestrator converts them into per-item failures only
/// when they come from the upsert sink.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors from the embedding provider.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The provider answered but returned no vector data. Terminal for
    /// that item, never a crash.
    #[error("provider returned an empty embedding")]
    EmptyEmbedding,

    /// Transport failure or non-success HTTP status.
    #[error("embedding API error: {0}")]
    Api(String),

    /// The response body did not have the expected shape.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_embed_error_display() {
        assert_eq!(
            EmbedError::EmptyEmbedding.to_string(),
            "provider returned an empty embedding"
        );
        let err = EmbedError::Api("429 Too Many Requests".to_string());
        assert!(err.to_string().contains("429"));
    }
}
