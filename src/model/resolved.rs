//! Canonical output node types
//!
//! `ResolvedNode` is what the shell receives. The underscore-prefixed
//! fields only ever appear on the first node produced from a fragment and
//! are carried there by `RootSideChannel`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::fragment::{DefineEntity, NodeTarget, UserSettingsConfig};

/// Keys computed by the assembler; authored values under these names are dropped
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "viewUrl",
    "isMissingMandatoryData",
    "helpContext",
    "breadcrumbBadge",
    "_intentMappings",
    "_entityRelativePaths",
    "_preloadUrl",
    "_requiredIFramePermissionsForViewGroup",
    "_userSettingsConfig",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_segment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,

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
    pub children: Option<Vec<ResolvedNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<ResolvedCompound>,

    // Provider overlay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_missing_mandatory_data: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb_badge: Option<Value>,

    // Root-only side channel
    #[serde(
        rename = "_intentMappings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub intent_mappings: Option<Vec<ResolvedIntent>>,

    #[serde(
        rename = "_entityRelativePaths",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_relative_paths: Option<BTreeMap<String, EntityRelativePathEntry>>,

    #[serde(
        rename = "_preloadUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preload_url: Option<String>,

    #[serde(
        rename = "_requiredIFramePermissionsForViewGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub required_iframe_permissions: Option<Value>,

    #[serde(
        rename = "_userSettingsConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_settings_config: Option<UserSettingsConfig>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl ResolvedNode {
    /// Visit this node and every descendant, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ResolvedNode)) {
        visit(self);
        for child in self.children.iter().flatten() {
            child.walk(visit);
        }
    }

    pub fn child(&self, index: usize) -> Option<&ResolvedNode> {
        self.children.as_ref().and_then(|c| c.get(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResolvedCompound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResolvedCompoundChild>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCompoundChild {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where an entity is defined, relative to its enclosing entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelativePathEntry {
    pub path_segment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_entity: Option<String>,
}

/// A cross-navigation target qualified by entity chain and path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIntent {
    pub semantic_object: String,
    pub action: String,
    /// Dotted chain of entity ids leading to the target node
    pub base_entity_id: String,
    /// Path from that entity boundary to the target; empty at the boundary itself
    pub relative_path: String,
}

/// Fragment-wide metadata destined for the fragment's first node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootSideChannel {
    pub preload_url: Option<String>,
    pub required_iframe_permissions: Option<Value>,
    pub user_settings_config: Option<UserSettingsConfig>,
    /// Set whenever the fragment has at least one entity-typed root, even if empty
    pub intent_mappings: Option<Vec<ResolvedIntent>>,
    pub entity_relative_paths: Option<BTreeMap<String, EntityRelativePathEntry>>,
}

impl RootSideChannel {
    /// Move the side-channel fields onto `nodes[0]`; a no-op for an empty fragment
    pub fn attach(self, nodes: &mut [ResolvedNode]) {
        let Some(root) = nodes.first_mut() else {
            return;
        };

        if self.intent_mappings.is_some() {
            root.intent_mappings = self.intent_mappings;
        }
        if self.entity_relative_paths.is_some() {
            root.entity_relative_paths = self.entity_relative_paths;
        }
        if self.preload_url.is_some() {
            root.preload_url = self.preload_url;
        }
        if self.required_iframe_permissions.is_some() {
            root.required_iframe_permissions = self.required_iframe_permissions;
        }
        if self.user_settings_config.is_some() {
            root.user_settings_config = self.user_settings_config;
        }
    }
}

/// Output of processing one fragment, before side-channel attachment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentResult {
    pub root_side_channel: RootSideChannel,
    pub nodes: Vec<ResolvedNode>,
}

impl FragmentResult {
    /// Flatten into the node list the shell sees
    pub fn into_nodes(self) -> Vec<ResolvedNode> {
        let FragmentResult {
            root_side_channel,
            mut nodes,
        } = self;
        root_side_channel.attach(&mut nodes);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_side_channel_lands_on_first_node_only() {
        let mut paths = BTreeMap::new();
        paths.insert(
            "project".to_string(),
            EntityRelativePathEntry {
                path_segment: "/projects/:projectId".to_string(),
                parent_entity: Some("global".to_string()),
            },
        );
        let side = RootSideChannel {
            preload_url: Some("https://mfe.example.com/preload".to_string()),
            intent_mappings: Some(vec![]),
            entity_relative_paths: Some(paths),
            ..Default::default()
        };

        let result = FragmentResult {
            root_side_channel: side,
            nodes: vec![ResolvedNode::default(), ResolvedNode::default()],
        };
        let nodes = result.into_nodes();

        assert!(nodes[0].preload_url.is_some());
        assert!(nodes[0].entity_relative_paths.is_some());
        assert_eq!(nodes[0].intent_mappings.as_deref(), Some(&[][..]));
        assert!(nodes[1].preload_url.is_none());
        assert!(nodes[1].entity_relative_paths.is_none());
    }

    #[test]
    fn test_empty_fragment_drops_side_channel() {
        let result = FragmentResult {
            root_side_channel: RootSideChannel {
                preload_url: Some("x".to_string()),
                ..Default::default()
            },
            nodes: vec![],
        };
        assert!(result.into_nodes().is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let node = ResolvedNode {
            path_segment: Some("home".to_string()),
            view_url: Some("https://a.com/home".to_string()),
            preload_url: Some("https://a.com/preload".to_string()),
            required_iframe_permissions: Some(json!({"allow": ["camera"]})),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "pathSegment": "home",
                "viewUrl": "https://a.com/home",
                "_preloadUrl": "https://a.com/preload",
                "_requiredIFramePermissionsForViewGroup": {"allow": ["camera"]}
            })
        );
    }
}
