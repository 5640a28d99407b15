//! Manifest resolution.
//!
//! Building the manifest itself is the job of a separate service. The launcher
//! only needs a URL from which the viewer can later download it.

use crate::config::ResolvedConfig;
use crate::constants::{MANIFEST_SELECTION_PARAMS, SETTING_MANIFEST_SERVICE};
use crate::error::{LaunchError, LaunchResult};
use crate::request::LaunchRequest;
use async_trait::async_trait;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Outcome of a manifest resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestResolution {
    /// URL of the manifest.
    Reference(String),
    /// The request does not describe a manifest; nothing is launched.
    Invalid,
}

/// Resolves the manifest reference of a launch request.
#[async_trait]
pub trait ManifestService: Send + Sync {
    /// Resolve the manifest for one request.
    async fn resolve(
        &self,
        request: &LaunchRequest,
        config: &ResolvedConfig,
    ) -> LaunchResult<ManifestResolution>;
}

/// Addresses a manifest builder by forwarding the study selection parameters.
///
/// The builder endpoint is read from the `manifest.service.url` setting.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryManifestService;

/// Always returns the same reference. Handy when the manifest is prepared out of band.
#[derive(Debug, Clone)]
pub struct StaticManifest(pub String);

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ManifestService for QueryManifestService {
    async fn resolve(
        &self,
        request: &LaunchRequest,
        config: &ResolvedConfig,
    ) -> LaunchResult<ManifestResolution> {
        let endpoint = config
            .get(SETTING_MANIFEST_SERVICE)
            .ok_or_else(|| LaunchError::MissingSetting(SETTING_MANIFEST_SERVICE.to_string()))?;

        let query: Vec<String> = MANIFEST_SELECTION_PARAMS
            .iter()
            .flat_map(move |name| {
                request
                    .params
                    .all(name)
                    .iter()
                    .filter(|value| !value.trim().is_empty())
                    .map(move |value| format!("{}={}", name, urlencoding::encode(value.trim())))
            })
            .collect();

        if query.is_empty() {
            tracing::debug!("No study selection parameter, no manifest to build");
            return Ok(ManifestResolution::Invalid);
        }

        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let reference = format!("{}{}{}", endpoint, separator, query.join("&"));
        tracing::debug!("Manifest reference: {}", reference);
        Ok(ManifestResolution::Reference(reference))
    }
}

#[async_trait]
impl ManifestService for StaticManifest {
    async fn resolve(
        &self,
        _request: &LaunchRequest,
        _config: &ResolvedConfig,
    ) -> LaunchResult<ManifestResolution> {
        Ok(ManifestResolution::Reference(self.0.clone()))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestParameters;

    fn config(endpoint: &str) -> ResolvedConfig {
        [(SETTING_MANIFEST_SERVICE, endpoint)].into_iter().collect()
    }

    #[tokio::test]
    async fn test_no_selection_is_invalid() {
        let request = LaunchRequest::new(RequestParameters::new().with("argument", "-v"));
        let resolution = QueryManifestService
            .resolve(&request, &config("http://pacs/manifest"))
            .await
            .unwrap();
        assert_eq!(resolution, ManifestResolution::Invalid);
    }

    #[tokio::test]
    async fn test_blank_selection_is_invalid() {
        let request = LaunchRequest::new(RequestParameters::new().with("studyUID", " "));
        let resolution = QueryManifestService
            .resolve(&request, &config("http://pacs/manifest"))
            .await
            .unwrap();
        assert_eq!(resolution, ManifestResolution::Invalid);
    }

    #[tokio::test]
    async fn test_selection_forwarded_in_fixed_order() {
        let params = RequestParameters::new()
            .with("studyUID", "1.2.3")
            .with("patientID", "P 1&2")
            .with("studyUID", "4.5.6");
        let resolution = QueryManifestService
            .resolve(&LaunchRequest::new(params), &config("http://pacs/manifest"))
            .await
            .unwrap();
        assert_eq!(
            resolution,
            ManifestResolution::Reference(
                "http://pacs/manifest?patientID=P%201%262&studyUID=1.2.3&studyUID=4.5.6"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_endpoint_with_query() {
        let params = RequestParameters::new().with("accessionNumber", "A1");
        let resolution = QueryManifestService
            .resolve(&LaunchRequest::new(params), &config("http://pacs/manifest?gzip=1"))
            .await
            .unwrap();
        assert_eq!(
            resolution,
            ManifestResolution::Reference(
                "http://pacs/manifest?gzip=1&accessionNumber=A1".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_an_error() {
        let params = RequestParameters::new().with("studyUID", "1.2.3");
        let result = QueryManifestService
            .resolve(&LaunchRequest::new(params), &ResolvedConfig::default())
            .await;
        assert!(matches!(result, Err(LaunchError::MissingSetting(_))));
    }

    #[tokio::test]
    async fn test_static_manifest() {
        let service = StaticManifest("wado:http://host/manifest.xml".to_string());
        let resolution = service
            .resolve(&LaunchRequest::default(), &ResolvedConfig::default())
            .await
            .unwrap();
        assert_eq!(
            resolution,
            ManifestResolution::Reference("wado:http://host/manifest.xml".to_string())
        );
    }
}
