//! Preprint source adapters behind a common trait.
//!
//! Each adapter turns its upstream schema into [`Paper`] records, applies the
//! date window and keyword filter from a [`FetchRequest`], and returns at most
//! `limit` papers ordered newest-first.
//!
//! # Feature Flags
//!
//! - `arxiv` - Enable the arXiv adapter (default: enabled)
//! - `biorxiv` - Enable the bioRxiv adapter (default: enabled)
//!
//! # Failure handling
//!
//! [`Source::fetch`] reports whole-source failures as [`SourceError`]. The
//! pipeline calls [`Source::fetch_or_empty`], which logs the failure and
//! treats the source as having returned nothing.

#[cfg(feature = "source-arxiv")]
mod arxiv;
#[cfg(feature = "source-biorxiv")]
mod biorxiv;
mod filter;
pub mod mock;
mod registry;

#[cfg(feature = "source-arxiv")]
pub use arxiv::ArxivSource;
#[cfg(feature = "source-biorxiv")]
pub use biorxiv::BiorxivSource;
pub use filter::{candidate_budget, matches_keywords, KEYWORD_OVERFETCH, PLAIN_OVERFETCH};
pub use mock::MockSource;
pub use registry::SourceKind;

use crate::models::{FetchRequest, Paper};
use async_trait::async_trait;

/// The Source trait defines the interface for all preprint adapters.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch papers matching the request, newest first, at most `request.limit`
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Paper>, SourceError>;

    /// Fetch papers, degrading any whole-source failure to an empty list
    async fn fetch_or_empty(&self, request: &FetchRequest) -> Vec<Paper> {
        match self.fetch(request).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::error!(source = self.id(), "Error fetching {}: {}", self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (Atom, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// The source was not compiled into this binary
    #[error("Source '{0}' is not enabled in this build")]
    Disabled(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaperBuilder, SourceType};
    use chrono::NaiveDate;

    #[derive(Debug)]
    struct FailingSource;

    #[async_trait]
    impl Source for FailingSource {
        fn id(&self) -> &str {
            "failing"
        }

        fn name(&self) -> &str {
            "Failing"
        }

        async fn fetch(&self, _request: &FetchRequest) -> Result<Vec<Paper>, SourceError> {
            Err(SourceError::Network("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_fetch_or_empty_degrades_failure() {
        let papers = FailingSource.fetch_or_empty(&FetchRequest::new(5)).await;
        assert!(papers.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_or_empty_passes_results_through() {
        let source = MockSource::new();
        let paper = PaperBuilder::new(
            SourceType::Arxiv,
            "Title",
            "http://arxiv.org/abs/1",
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        )
        .abstract_text("Abstract")
        .build()
        .unwrap();
        source.set_papers(vec![paper.clone()]);

        let papers = source.fetch_or_empty(&FetchRequest::new(5)).await;
        assert_eq!(papers, vec![paper]);
    }
}
