//! Orchestrator
//!
//! Drives the pipeline for every provider of a request:
//!
//! raw fragment -> localization -> tree builder -> transfer side channel
//! -> intent resolution -> side channel attached to the first node
//! -> extended data overlay
//!
//! Each fragment runs as its own tokio task. A fragment that fails to
//! load, parse or process (or whose task panics) is logged and left out;
//! its siblings and the other providers are unaffected. Fragments of the
//! same provider never share entity or intent state.

use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AssemblerConfig;
use crate::discovery::ServiceProviderDiscovery;
use crate::error::{AssemblyError, AssemblyResult};
use crate::extended::apply_extended_data;
use crate::fetch::{
    load_fragment_document, FragmentFetcher, HttpFragmentFetcher, RequestScopedFetcher,
};
use crate::intent::resolve_intents;
use crate::localization::localize_fragment;
use crate::model::{
    ConfigurationFragment, ExtendedData, FragmentReference, FragmentResult, RawServiceProvider,
    RequestContext, ResolvedNode, ServiceProvider,
};
use crate::tree::{transfer_side_channel, url_origin, TreeBuilder};

// ============================================================================
// Single fragment
// ============================================================================

/// Base URL that node `urlSuffix` values are appended to.
///
/// The origin of the reference's deployment `url`, else of its remote
/// configuration location, else empty.
pub fn url_template_url(reference: &FragmentReference) -> String {
    let location = match (&reference.url, &reference.remote_configuration) {
        (Some(url), _) => Some(url.as_str()),
        (None, Some(remote)) => Some(remote.url.as_str()),
        (None, None) => None,
    };

    match location.map(url_origin) {
        Some(Ok(Some(origin))) => origin,
        Some(Ok(None)) | None => String::new(),
        Some(Err(e)) => {
            warn!(
                source = reference.source_id(),
                error = %e,
                "Cannot derive url template from fragment location"
            );
            String::new()
        }
    }
}

/// Run the synchronous core over one raw fragment document
pub fn process_fragment(
    document: Value,
    language: &str,
    url_template_url: &str,
    source_id: &str,
) -> AssemblyResult<FragmentResult> {
    let localized = localize_fragment(document, language)?;
    let mut fragment: ConfigurationFragment = serde_json::from_value(localized)
        .map_err(|e| AssemblyError::malformed(source_id, e.to_string()))?;

    let raw_nodes = std::mem::take(&mut fragment.nodes);
    let builder = TreeBuilder::new(fragment.node_defaults.as_ref(), url_template_url);
    let nodes = builder.build(raw_nodes);

    let mut side_channel = transfer_side_channel(&fragment, url_template_url);
    let intents = resolve_intents(&nodes, fragment.inbounds());
    debug!(
        source = source_id,
        nodes = nodes.len(),
        entity_roots = intents.entity_roots,
        intents = intents.intent_mappings.len(),
        "Processed configuration fragment"
    );
    if intents.entity_roots > 0 {
        side_channel.intent_mappings = Some(intents.intent_mappings);
        side_channel.entity_relative_paths = Some(intents.entity_relative_paths);
    }

    Ok(FragmentResult {
        root_side_channel: side_channel,
        nodes,
    })
}

async fn load_and_process(
    reference: FragmentReference,
    fetcher: Arc<dyn FragmentFetcher>,
    language: String,
) -> AssemblyResult<Vec<ResolvedNode>> {
    let document = load_fragment_document(&reference, fetcher.as_ref()).await?;
    let template = url_template_url(&reference);
    let source_id = reference.source_id();
    let result = process_fragment(document, &language, &template, source_id)?;
    Ok(result.into_nodes())
}

// ============================================================================
// Providers
// ============================================================================

/// Process all fragments of one provider concurrently and overlay its extended data
async fn assemble_provider_with(
    provider: RawServiceProvider,
    fetcher: Arc<dyn FragmentFetcher>,
    language: &str,
) -> ServiceProvider {
    let extended = ExtendedData::from_provider(&provider);

    let (source_ids, tasks): (Vec<String>, Vec<_>) = provider
        .content_configuration_fragments
        .iter()
        .cloned()
        .map(|reference| {
            let source_id = reference.source_id().to_string();
            let language = language.to_string();
            let task = tokio::spawn(load_and_process(reference, fetcher.clone(), language));
            (source_id, task)
        })
        .unzip();

    let mut nodes = Vec::new();
    for (source_id, outcome) in source_ids.iter().zip(join_all(tasks).await) {
        match outcome {
            Ok(Ok(fragment_nodes)) => nodes.extend(fragment_nodes),
            Ok(Err(e)) => warn!(
                provider = %provider.name,
                source = %source_id,
                error = %e,
                "Skipping configuration fragment"
            ),
            Err(e) => warn!(
                provider = %provider.name,
                source = %source_id,
                error = %e,
                "Configuration fragment task did not complete"
            ),
        }
    }

    ServiceProvider {
        name: provider.name,
        display_name: provider.display_name,
        creation_timestamp: provider.creation_timestamp,
        nodes: nodes
            .into_iter()
            .map(|node| apply_extended_data(node, &extended))
            .collect(),
    }
}

/// Entry point for the host: builds the navigation for one request
pub struct NavigationAssembler {
    discovery: Arc<dyn ServiceProviderDiscovery>,
    fetcher: Arc<dyn FragmentFetcher>,
    config: AssemblerConfig,
}

impl NavigationAssembler {
    pub fn new(
        discovery: Arc<dyn ServiceProviderDiscovery>,
        fetcher: Arc<dyn FragmentFetcher>,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            discovery,
            fetcher,
            config,
        }
    }

    /// Assembler fetching remote fragments over HTTP
    pub fn with_http(
        discovery: Arc<dyn ServiceProviderDiscovery>,
        config: AssemblerConfig,
    ) -> AssemblyResult<Self> {
        let fetcher = Arc::new(HttpFragmentFetcher::new(&config)?);
        Ok(Self::new(discovery, fetcher, config))
    }

    /// Assemble navigation for every provider visible to `request`.
    ///
    /// Only a failing discovery is an error. Providers come back in
    /// discovery order; fragments that failed are simply absent.
    pub async fn assemble(&self, request: &RequestContext) -> AssemblyResult<Vec<ServiceProvider>> {
        let providers = self
            .discovery
            .list_providers(request)
            .await
            .map_err(AssemblyError::Discovery)?;

        let language = self.config.language_for(&request.language);
        info!(
            providers = providers.len(),
            language,
            tenant = ?request.tenant,
            "Assembling navigation"
        );

        let fetcher = self.request_fetcher();
        let assembling = providers
            .into_iter()
            .map(|provider| assemble_provider_with(provider, fetcher.clone(), language));

        Ok(join_all(assembling).await)
    }

    /// Assemble a single provider outside a full request
    pub async fn assemble_provider(
        &self,
        provider: RawServiceProvider,
        language: &str,
    ) -> ServiceProvider {
        let language = self.config.language_for(language);
        assemble_provider_with(provider, self.request_fetcher(), language).await
    }

    fn request_fetcher(&self) -> Arc<dyn FragmentFetcher> {
        Arc::new(RequestScopedFetcher::new(self.fetcher.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEMPLATE: &str = "https://mfe.example.com";

    #[test]
    fn test_url_template_from_reference() {
        let reference = FragmentReference::remote("https://cdn.example.com:81/a/config.json");
        assert_eq!(url_template_url(&reference), "https://cdn.example.com:81");

        let reference = reference.with_url("https://app.example.com/ui/");
        assert_eq!(url_template_url(&reference), "https://app.example.com");

        let reference = FragmentReference::default().with_url("not a url");
        assert_eq!(url_template_url(&reference), "");

        assert_eq!(url_template_url(&FragmentReference::default()), "");
    }

    #[test]
    fn test_process_fragment_end_to_end() {
        let document = json!({
            "texts": [
                {"locale": "", "textDictionary": {"home": "Home"}},
                {"locale": "de", "textDictionary": {"home": "Startseite"}}
            ],
            "nodeDefaults": {"entityType": "global"},
            "viewGroup": {"preloadSuffix": "/preload"},
            "crossNavigation": {"inbounds": {"openHome": {"semanticObject": "Home", "action": "display"}}},
            "nodes": [
                {"pathSegment": "home", "label": "{{home}}", "urlSuffix": "/#/home",
                 "target": {"inboundId": "openHome"}},
                {"pathSegment": "about", "label": "About", "url": "https://about.example.com/"}
            ]
        });

        let result = process_fragment(document, "de", TEMPLATE, "test");
        let nodes = result.unwrap().into_nodes();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].label.as_deref(), Some("Startseite"));
        assert_eq!(
            nodes[0].view_url.as_deref(),
            Some("https://mfe.example.com/#/home")
        );
        assert_eq!(
            nodes[0].preload_url.as_deref(),
            Some("https://mfe.example.com/preload")
        );
        let intents = nodes[0].intent_mappings.as_ref().unwrap();
        assert_eq!(
            serde_json::to_value(intents).unwrap(),
            json!([{"semanticObject": "Home", "action": "display", "baseEntityId": "global", "relativePath": "/home"}])
        );
        assert!(nodes[1].intent_mappings.is_none());
        assert!(nodes[1].preload_url.is_none());
        assert_eq!(nodes[1].view_group.as_deref(), Some(TEMPLATE));
    }

    #[test]
    fn test_malformed_fragment_is_an_error() {
        let document = json!({"nodeDefaults": {}});
        let err = process_fragment(document, "en", "", "broken").unwrap_err();
        match err {
            AssemblyError::MalformedFragment { source_id, .. } => assert_eq!(source_id, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fragment_without_entities_has_no_intent_fields() {
        let document = json!({"nodes": [{"pathSegment": "a"}]});
        let result = process_fragment(document, "en", "", "plain").unwrap();
        let nodes = result.into_nodes();
        assert!(nodes[0].intent_mappings.is_none());
        assert!(nodes[0].entity_relative_paths.is_none());
    }

    #[test]
    fn test_entity_root_without_entities_gets_empty_intent_fields() {
        let document = json!({"nodes": [{"pathSegment": "x", "entityType": "global"}]});
        let nodes = process_fragment(document, "en", "", "bare")
            .unwrap()
            .into_nodes();

        assert_eq!(
            serde_json::to_value(&nodes[0]).unwrap(),
            json!({
                "pathSegment": "x",
                "entityType": "global",
                "_intentMappings": [],
                "_entityRelativePaths": {}
            })
        );
    }
}
