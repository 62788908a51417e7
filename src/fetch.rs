//! Fragment retrieval
//!
//! Inline fragments are parsed in place; remote ones go through a
//! `FragmentFetcher`. `RequestScopedFetcher` wraps any fetcher so that one
//! assembly call hits each remote location at most once. Nothing is cached
//! beyond that call.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::error::{AssemblyError, AssemblyResult};
use crate::model::{ContentFormat, FragmentReference};

/// Resolves a remote fragment location to its raw document
#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    async fn fetch(&self, location: &str, format: ContentFormat) -> AssemblyResult<Value>;
}

/// Parse a fragment payload in the given format into a JSON document
pub fn parse_payload(content: &str, format: ContentFormat) -> AssemblyResult<Value> {
    match format {
        ContentFormat::Json => Ok(serde_json::from_str(content)?),
        ContentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
}

/// Raw document for `reference`; inline content wins over a remote location
pub async fn load_fragment_document(
    reference: &FragmentReference,
    fetcher: &dyn FragmentFetcher,
) -> AssemblyResult<Value> {
    if let Some(inline) = &reference.inline_configuration {
        return parse_payload(&inline.content, inline.content_type);
    }
    if let Some(remote) = &reference.remote_configuration {
        return fetcher.fetch(&remote.url, remote.content_type).await;
    }
    Err(AssemblyError::malformed(
        reference.source_id(),
        "neither inline nor remote configuration given",
    ))
}

/// HTTP fetcher backed by `reqwest`
pub struct HttpFragmentFetcher {
    client: Client,
}

impl HttpFragmentFetcher {
    pub fn new(config: &AssemblerConfig) -> AssemblyResult<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AssemblyError::fetch("<http client>", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FragmentFetcher for HttpFragmentFetcher {
    async fn fetch(&self, location: &str, format: ContentFormat) -> AssemblyResult<Value> {
        debug!(location, "Fetching remote fragment");

        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(|e| AssemblyError::fetch(location, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssemblyError::HttpStatus {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AssemblyError::fetch(location, e))?;

        parse_payload(&body, format)
    }
}

type CachedOutcome = Result<Value, String>;

/// Memoises fetch outcomes for the lifetime of one assembly call.
///
/// Failures are memoised too and come back as `AssemblyError::Fetch`
/// carrying the original error text.
pub struct RequestScopedFetcher {
    inner: Arc<dyn FragmentFetcher>,
    cells: Mutex<HashMap<(String, ContentFormat), Arc<OnceCell<CachedOutcome>>>>,
}

impl RequestScopedFetcher {
    pub fn new(inner: Arc<dyn FragmentFetcher>) -> Self {
        Self {
            inner,
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, location: &str, format: ContentFormat) -> Arc<OnceCell<CachedOutcome>> {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells
            .entry((location.to_string(), format))
            .or_default()
            .clone()
    }
}

#[async_trait]
impl FragmentFetcher for RequestScopedFetcher {
    async fn fetch(&self, location: &str, format: ContentFormat) -> AssemblyResult<Value> {
        let cell = self.cell(location, format);
        let outcome = cell
            .get_or_init(|| async {
                self.inner
                    .fetch(location, format)
                    .await
                    .map_err(|e| e.to_string())
            })
            .await;

        outcome
            .clone()
            .map_err(|reason| AssemblyError::fetch(location, reason))
    }
}
