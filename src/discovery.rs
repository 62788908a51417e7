//! Service provider discovery
//!
//! The assembler does not know where providers come from. Hosts plug in a
//! `ServiceProviderDiscovery` that talks to their extension registry; a
//! static list covers fixed deployments and tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{RawServiceProvider, RequestContext};

/// Lists the providers visible to one request
#[async_trait]
pub trait ServiceProviderDiscovery: Send + Sync {
    async fn list_providers(&self, request: &RequestContext) -> Result<Vec<RawServiceProvider>>;
}

/// Discovery over a fixed provider list
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    providers: Vec<RawServiceProvider>,
}

impl StaticDiscovery {
    pub fn new(providers: Vec<RawServiceProvider>) -> Self {
        Self { providers }
    }

    /// Load the provider list from a JSON document (an array of providers)
    pub fn from_json(document: &str) -> Result<Self> {
        let providers = serde_json::from_str(document)?;
        Ok(Self { providers })
    }
}

#[async_trait]
impl ServiceProviderDiscovery for StaticDiscovery {
    async fn list_providers(&self, _request: &RequestContext) -> Result<Vec<RawServiceProvider>> {
        Ok(self.providers.clone())
    }
}
