//! Selection of the single source a run fetches from.

use std::sync::Arc;

use super::{Source, SourceError};
use crate::config::SourcesConfig;
use crate::models::SourceType;
use crate::utils::HttpClient;

/// The closed set of preprint sources a run can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Arxiv,
    BioRxiv,
}

impl SourceKind {
    /// Resolve the mutually exclusive `--arxiv` / `--biorxiv` flags
    pub fn from_flags(arxiv: bool, biorxiv: bool) -> Result<Self, SourceError> {
        match (arxiv, biorxiv) {
            (true, false) => Ok(SourceKind::Arxiv),
            (false, true) => Ok(SourceKind::BioRxiv),
            (false, false) => Err(SourceError::InvalidRequest(
                "exactly one source must be selected (--arxiv or --biorxiv)".to_string(),
            )),
            (true, true) => Err(SourceError::InvalidRequest(
                "--arxiv and --biorxiv are mutually exclusive".to_string(),
            )),
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            SourceKind::Arxiv => SourceType::Arxiv,
            SourceKind::BioRxiv => SourceType::BioRxiv,
        }
    }

    /// Build the adapter for this source
    pub fn create(
        &self,
        config: &SourcesConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn Source>, SourceError> {
        match self {
            #[cfg(feature = "source-arxiv")]
            SourceKind::Arxiv => Ok(Arc::new(super::ArxivSource::with_base_url(
                Arc::new(client),
                &config.arxiv_api_url,
            ))),
            #[cfg(feature = "source-biorxiv")]
            SourceKind::BioRxiv => Ok(Arc::new(super::BiorxivSource::with_base_url(
                Arc::new(client),
                &config.biorxiv_api_url,
            ))),
            #[allow(unreachable_patterns)]
            other => {
                let _ = (config, client);
                Err(SourceError::Disabled(other.source_type().id().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(SourceKind::from_flags(true, false).unwrap(), SourceKind::Arxiv);
        assert_eq!(SourceKind::from_flags(false, true).unwrap(), SourceKind::BioRxiv);
        assert!(SourceKind::from_flags(false, false).is_err());
        assert!(SourceKind::from_flags(true, true).is_err());
    }

    #[test]
    fn test_create_uses_kind() {
        let config = SourcesConfig::default();
        let client = HttpClient::new().unwrap();

        let source = SourceKind::BioRxiv.create(&config, client).unwrap();
        assert_eq!(source.id(), "biorxiv");
        assert_eq!(source.name(), "bioRxiv");
    }
}
