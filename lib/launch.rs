//! Launch orchestration.
//!
//! Resolves the connector configuration for the request, asks the access policy,
//! resolves the manifest and turns the result into a launch URI. Collaborators
//! are handed in at construction; the launcher keeps no per-request state.

use crate::access::{Access, AccessPolicy, HostAllowList};
use crate::config::ConnectorConfig;
use crate::descriptor::build_descriptor;
use crate::error::LaunchResult;
use crate::manifest::{ManifestResolution, ManifestService, QueryManifestService};
use crate::request::LaunchRequest;
use crate::uri::{LaunchUri, assemble};
use std::sync::Arc;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Result of a launch attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Redirect the client to this URI.
    Redirect(LaunchUri),
    /// The access policy rejected the request.
    Denied,
    /// No manifest could be derived from the request.
    NoManifest,
}

/// Turns launch requests into launch URIs.
#[derive(Clone)]
pub struct Launcher {
    config: Arc<ConnectorConfig>,
    policy: Arc<dyn AccessPolicy>,
    manifests: Arc<dyn ManifestService>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Launcher {
    /// Create a launcher from explicit collaborators.
    pub fn new(
        config: ConnectorConfig,
        policy: Arc<dyn AccessPolicy>,
        manifests: Arc<dyn ManifestService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            policy,
            manifests,
        }
    }

    /// Create a launcher with the host allow-list and the query manifest service.
    pub fn with_defaults(config: ConnectorConfig) -> Self {
        Self::new(
            config,
            Arc::new(HostAllowList),
            Arc::new(QueryManifestService),
        )
    }

    /// Handle one launch request.
    pub async fn launch(&self, request: &LaunchRequest) -> LaunchResult<LaunchOutcome> {
        if tracing::enabled!(tracing::Level::DEBUG) {
            log_request(request);
        }

        let config = self.config.resolve(request);

        if self.policy.decide(request, &config) == Access::Deny {
            return Ok(LaunchOutcome::Denied);
        }

        let manifest = match self.manifests.resolve(request, &config).await? {
            ManifestResolution::Reference(reference) => reference,
            ManifestResolution::Invalid => return Ok(LaunchOutcome::NoManifest),
        };

        let descriptor = build_descriptor(&manifest, &config, request)?;
        let uri = assemble(&descriptor);
        tracing::info!("Redirect to {}", uri);
        Ok(LaunchOutcome::Redirect(uri))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn log_request(request: &LaunchRequest) {
    tracing::debug!(
        "Launch request from {} (base URL: {})",
        request
            .peer
            .map(|peer| peer.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        request.base_url.as_deref().unwrap_or("unknown")
    );
    for (name, values) in request.params.iter() {
        tracing::debug!("  {} = {:?}", name, values);
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
