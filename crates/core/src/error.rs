//! Error taxonomy for content resolution and rendering.

use thiserror::Error;

/// Error surfaced by a fetch client while executing a query document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fetch failed: {message}")]
pub struct FetchError {
    /// Human-readable failure description from the client.
    pub message: String,
}

impl FetchError {
    /// Creates a fetch error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised during content resolution and rendering.
///
/// Data-integrity and configuration failures are never recovered locally:
/// they propagate to the caller of the top-level resolve entry point.
/// Multi-result fetch ambiguity is deliberately absent here; it is recovered
/// in place (first item wins) and only logged.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A non-inline reference without a usable key.
    #[error("invalid content reference: {0}")]
    InvalidReference(String),

    /// Inline content can never be fetched; its data must come from the parent.
    #[error("inline content {key:?} has no provided data")]
    InlineContentWithoutData {
        /// Synthetic key of the inline reference, when one exists.
        key: Option<String>,
    },

    /// A fetch was required but no client is available on the context.
    #[error("no fetch client available to load content {key}")]
    MissingFetchClient {
        /// Key of the content that needed loading.
        key: String,
    },

    /// A fragment fetch that required exactly one item returned none.
    #[error("content not found: key={key}, version={version:?}, locale={locale:?}")]
    ContentNotFound {
        /// Requested content key.
        key: String,
        /// Requested version constraint, if any.
        version: Option<String>,
        /// Requested locale, if any.
        locale: Option<String>,
    },

    /// No renderer matched any candidate dispatch key for a structural node.
    ///
    /// Unlike leaves, structural nodes have no fallback: they are the
    /// container for already-resolved children that would otherwise be lost.
    #[error("no structural renderer for node {name:?} (tried: {tried:?})")]
    NoStructuralRenderer {
        /// Node name, when the upstream supplied one.
        name: Option<String>,
        /// Candidate dispatch keys probed, most specific first.
        tried: Vec<String>,
    },

    /// The resolution context was built without a renderer registry.
    #[error("no renderer registry configured on the resolution context")]
    MissingRegistry,

    /// A raw composition node fit neither the structural nor the leaf shape.
    #[error("malformed composition node: {0}")]
    MalformedNode(String),

    /// The fetch client reported a failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl EngineError {
    /// Creates a not-found error for the given reference coordinates.
    pub fn not_found(
        key: impl Into<String>,
        version: Option<String>,
        locale: Option<String>,
    ) -> Self {
        Self::ContentNotFound {
            key: key.into(),
            version,
            locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = EngineError::not_found("abc", Some("3".to_string()), None);
        let text = err.to_string();
        assert!(text.contains("content not found"));
        assert!(text.contains("abc"));
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err = EngineError::from(FetchError::new("boom"));
        assert_eq!(err.to_string(), "fetch failed: boom");
    }

    #[test]
    fn test_missing_registry_display() {
        let err = EngineError::MissingRegistry;
        assert!(err.to_string().contains("registry"));
    }
}
