//! Provider-level types exchanged with the discovery and fetch collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::resolved::ResolvedNode;

/// Serialization format of a fragment payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineConfiguration {
    pub content: String,
    #[serde(default)]
    pub content_type: ContentFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfiguration {
    pub url: String,
    #[serde(default)]
    pub content_type: ContentFormat,
}

/// Pointer to one configuration fragment, inline or remote
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Deployment location of the micro frontend the fragment describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_configuration: Option<InlineConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_configuration: Option<RemoteConfiguration>,
}

impl FragmentReference {
    pub fn inline(
        name: impl Into<String>,
        content: impl Into<String>,
        format: ContentFormat,
    ) -> Self {
        Self {
            name: Some(name.into()),
            inline_configuration: Some(InlineConfiguration {
                content: content.into(),
                content_type: format,
            }),
            ..Default::default()
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            remote_configuration: Some(RemoteConfiguration {
                url: url.into(),
                content_type: ContentFormat::Json,
            }),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Identifier used when logging about this fragment
    pub fn source_id(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.remote_configuration.as_ref().map(|r| r.url.as_str()))
            .or(self.url.as_deref())
            .unwrap_or("<anonymous>")
    }
}

/// Provider-scoped overlay applied to every node the provider contributes
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_missing_mandatory_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_class_name: Option<String>,

    #[serde(
        default,
        alias = "helpCenterData",
        skip_serializing_if = "Option::is_none"
    )]
    pub help_context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb_badge: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_context: Option<Map<String, Value>>,
}

impl ExtendedData {
    /// Top-level provider fields, each falling back to `nodeExtendedData`
    pub fn from_provider(provider: &RawServiceProvider) -> Self {
        let nested = provider.node_extended_data.clone().unwrap_or_default();
        Self {
            is_missing_mandatory_data: provider
                .is_missing_mandatory_data
                .or(nested.is_missing_mandatory_data),
            extension_class_name: provider
                .extension_class_name
                .clone()
                .or(nested.extension_class_name),
            help_context: provider.help_center_data.clone().or(nested.help_context),
            breadcrumb_badge: provider
                .breadcrumb_badge
                .clone()
                .or(nested.breadcrumb_badge),
            node_context: provider.node_context.clone().or(nested.node_context),
        }
    }

    pub fn missing_mandatory_data(&self) -> bool {
        self.is_missing_mandatory_data.unwrap_or(false)
    }
}

/// Provider entry as returned by provider discovery
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawServiceProvider {
    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub content_configuration_fragments: Vec<FragmentReference>,

    #[serde(default)]
    pub node_context: Option<Map<String, Value>>,

    #[serde(default)]
    pub node_extended_data: Option<ExtendedData>,

    #[serde(default)]
    pub help_center_data: Option<Value>,

    #[serde(default)]
    pub breadcrumb_badge: Option<Value>,

    #[serde(default)]
    pub is_missing_mandatory_data: Option<bool>,

    #[serde(default)]
    pub extension_class_name: Option<String>,
}

/// Assembled navigation for one provider
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProvider {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub nodes: Vec<ResolvedNode>,
}

/// Per-request caller context; the token is opaque to this crate
#[derive(Clone, Default)]
pub struct RequestContext {
    pub token: String,
    pub tenant: Option<String>,
    pub language: String,
}

impl RequestContext {
    pub fn new(token: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tenant: None,
            language: language.into(),
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("token", &"<redacted>")
            .field("tenant", &self.tenant)
            .field("language", &self.language)
            .finish()
    }
}
