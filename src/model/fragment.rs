//! As-authored configuration fragment types
//!
//! Every node field the pipeline reasons about is typed. Anything else an
//! author writes (icons, categories, Luigi options the assembler does not
//! care about) is kept in the flattened `extra` map and passed through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One unit of navigation configuration from a single source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationFragment {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<TextDictionary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_defaults: Option<NodeDefaults>,

    pub nodes: Vec<RawNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_navigation: Option<CrossNavigation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<UserSettingsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_group: Option<ViewGroupSettings>,
}

impl ConfigurationFragment {
    /// Inbound target table, empty when the fragment declares none
    pub fn inbounds(&self) -> &BTreeMap<String, Inbound> {
        static EMPTY: BTreeMap<String, Inbound> = BTreeMap::new();
        self.cross_navigation
            .as_ref()
            .map(|c| &c.inbounds)
            .unwrap_or(&EMPTY)
    }
}

/// Text dictionary for one locale; the empty locale is the default
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDictionary {
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub text_dictionary: BTreeMap<String, String>,
}

/// Symbolic navigation targets keyed by inbound id
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CrossNavigation {
    #[serde(default)]
    pub inbounds: BTreeMap<String, Inbound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    pub semantic_object: String,
    pub action: String,
}

/// Fragment-wide view group settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewGroupSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload_suffix: Option<String>,

    #[serde(
        rename = "requiredIFramePermissions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub required_iframe_permissions: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserSettingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, UserSettingsGroup>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Marks a node as the boundary of an entity scope
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DefineEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Declares that a node is the destination of an inbound target
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Compound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CompoundChild>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Flat sibling entry of a compound node; only its URL gets resolved
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_suffix: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One node as written by the fragment author
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_segment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolate_view: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define_entity: Option<DefineEntity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RawNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<Compound>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fragment-scoped defaults; the same shape as a node, children are never inherited
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_segment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolate_view: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define_entity: Option<DefineEntity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<Compound>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawNode {
    /// Shallow, node-local merge: every field the node sets wins, every
    /// field it leaves out is taken from `defaults`.
    pub fn with_defaults(self, defaults: &NodeDefaults) -> RawNode {
        let mut extra = defaults.extra.clone();
        // Inherited children would make every child re-inherit the same subtree
        extra.remove("children");
        extra.extend(self.extra);

        RawNode {
            path_segment: self.path_segment.or_else(|| defaults.path_segment.clone()),
            label: self.label.or_else(|| defaults.label.clone()),
            url: self.url.or_else(|| defaults.url.clone()),
            url_suffix: self.url_suffix.or_else(|| defaults.url_suffix.clone()),
            view_group: self.view_group.or_else(|| defaults.view_group.clone()),
            isolate_view: self.isolate_view.or(defaults.isolate_view),
            entity_type: self.entity_type.or_else(|| defaults.entity_type.clone()),
            define_entity: self
                .define_entity
                .or_else(|| defaults.define_entity.clone()),
            target: self.target.or_else(|| defaults.target.clone()),
            context: self.context.or_else(|| defaults.context.clone()),
            children: self.children,
            compound: self.compound.or_else(|| defaults.compound.clone()),
            extra,
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.isolate_view.unwrap_or(false)
    }
}
