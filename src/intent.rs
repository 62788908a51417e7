//! Intent resolution engine
//!
//! Resolves declarative navigation targets (`target.inboundId`) into
//! entity-scoped paths the shell can navigate to across providers.
//!
//! Two passes over a fragment's resolved tree:
//!
//! 1. **Scan**: a depth-first walk from every top-level node that carries
//!    an `entityType`. It threads the current entity scope down the tree,
//!    registers every `defineEntity` boundary in the entity path index and
//!    records each declared target together with its scope.
//! 2. **Match**: declared targets are looked up in the fragment's inbound
//!    table. Unknown inbound ids are dropped; a target declared for an
//!    inbound this tenant does not offer is a normal authoring pattern.
//!
//! Entity ids are expected to be unique per fragment. When they are not,
//! the later registration replaces the earlier one in the path index.
//! That matches long-standing shell behaviour and is kept on purpose even
//! though it can hide authoring mistakes.

use std::collections::BTreeMap;
use tracing::debug;

use crate::model::{EntityRelativePathEntry, Inbound, ResolvedIntent, ResolvedNode};

/// Entity type that never composes into a qualified parent id
pub const GLOBAL_ENTITY_TYPE: &str = "global";

/// State threaded down one branch of the walk
#[derive(Debug, Clone)]
struct Scope {
    /// Id under which child entities register their parent
    parent_entity: String,
    /// Path accumulated since the last entity boundary
    path_segment: String,
    /// Dotted entity chain used as `baseEntityId`
    target_parent_entity: String,
}

impl Scope {
    fn root(entity_type: &str) -> Self {
        Self {
            parent_entity: entity_type.to_string(),
            path_segment: String::new(),
            target_parent_entity: entity_type.to_string(),
        }
    }
}

/// A target seen during the scan, not yet matched against inbounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredTarget {
    pub inbound_id: String,
    pub base_entity_id: String,
    pub relative_path: String,
}

/// Output of the scan pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityScan {
    /// Number of top-level nodes the walk started from
    pub entity_roots: usize,
    pub entity_relative_paths: BTreeMap<String, EntityRelativePathEntry>,
    pub targets: Vec<DeclaredTarget>,
}

/// Final result for one fragment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentResolution {
    pub entity_roots: usize,
    pub intent_mappings: Vec<ResolvedIntent>,
    pub entity_relative_paths: BTreeMap<String, EntityRelativePathEntry>,
}

/// Run both passes over the top-level nodes of one fragment
pub fn resolve_intents(
    nodes: &[ResolvedNode],
    inbounds: &BTreeMap<String, Inbound>,
) -> IntentResolution {
    let scan = scan_entities(nodes);
    IntentResolution {
        entity_roots: scan.entity_roots,
        intent_mappings: match_targets(&scan.targets, inbounds),
        entity_relative_paths: scan.entity_relative_paths,
    }
}

/// Pass 1: walk every entity-typed root and accumulate entity paths and targets
pub fn scan_entities(nodes: &[ResolvedNode]) -> EntityScan {
    let mut scan = EntityScan::default();
    for root in nodes {
        if let Some(entity_type) = root.entity_type.as_deref() {
            scan.entity_roots += 1;
            visit(root, Scope::root(entity_type), &mut scan);
        }
    }
    scan
}

fn visit(node: &ResolvedNode, mut scope: Scope, scan: &mut EntityScan) {
    let segment = node.path_segment.as_deref().unwrap_or_default();

    match entity_id(node) {
        Some(id) => {
            scan.entity_relative_paths.insert(
                id.to_string(),
                EntityRelativePathEntry {
                    path_segment: format!("{}/{}", scope.path_segment, segment),
                    parent_entity: Some(scope.parent_entity.clone()),
                },
            );

            scope.parent_entity = match node.entity_type.as_deref() {
                Some(entity_type) if entity_type != GLOBAL_ENTITY_TYPE => {
                    format!("{}.{}", entity_type, id)
                }
                _ => id.to_string(),
            };
            scope.target_parent_entity = format!("{}.{}", scope.target_parent_entity, id);
            scope.path_segment.clear();
        }
        None => {
            scope.path_segment = format!("{}/{}", scope.path_segment, segment);
        }
    }

    if let Some(inbound_id) = node.target.as_ref().and_then(|t| t.inbound_id.as_deref()) {
        scan.targets.push(DeclaredTarget {
            inbound_id: inbound_id.to_string(),
            base_entity_id: scope.target_parent_entity.clone(),
            relative_path: scope.path_segment.clone(),
        });
    }

    // Compound children carry no entity or target semantics and are skipped
    for child in node.children.iter().flatten() {
        visit(child, scope.clone(), scan);
    }
}

fn entity_id(node: &ResolvedNode) -> Option<&str> {
    node.define_entity
        .as_ref()
        .and_then(|d| d.id.as_deref())
        .filter(|id| !id.is_empty())
}

/// Pass 2: keep the targets whose inbound id is known, in declaration order
pub fn match_targets(
    targets: &[DeclaredTarget],
    inbounds: &BTreeMap<String, Inbound>,
) -> Vec<ResolvedIntent> {
    targets
        .iter()
        .filter_map(|target| match inbounds.get(&target.inbound_id) {
            Some(inbound) => Some(ResolvedIntent {
                semantic_object: inbound.semantic_object.clone(),
                action: inbound.action.clone(),
                base_entity_id: target.base_entity_id.clone(),
                relative_path: target.relative_path.clone(),
            }),
            None => {
                debug!(inbound_id = %target.inbound_id, "No inbound for declared target");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn nodes(value: Value) -> Vec<ResolvedNode> {
        serde_json::from_value(value).unwrap()
    }

    fn inbounds(value: Value) -> BTreeMap<String, Inbound> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_entity_with_target() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "root",
            "children": [{
                "pathSegment": "child",
                "defineEntity": {"id": "e1"},
                "target": {"inboundId": "in1"}
            }]
        }]));
        let result = resolve_intents(
            &tree,
            &inbounds(json!({"in1": {"semanticObject": "S", "action": "A"}})),
        );

        assert_eq!(
            serde_json::to_value(&result.entity_relative_paths).unwrap(),
            json!({"e1": {"pathSegment": "/root/child", "parentEntity": "global"}})
        );
        assert_eq!(
            serde_json::to_value(&result.intent_mappings).unwrap(),
            json!([{"semanticObject": "S", "action": "A", "baseEntityId": "global.e1", "relativePath": ""}])
        );
    }

    #[test]
    fn test_nested_entities_and_relative_paths() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "home",
            "children": [{
                "pathSegment": "projects",
                "children": [{
                    "pathSegment": ":projectId",
                    "defineEntity": {"id": "project"},
                    "children": [
                        {"pathSegment": "overview", "target": {"inboundId": "showProject"}},
                        {
                            "pathSegment": "components",
                            "children": [{
                                "pathSegment": ":componentId",
                                "defineEntity": {"id": "component"},
                                "children": [{
                                    "pathSegment": "settings",
                                    "children": [{"pathSegment": "general", "target": {"inboundId": "editComponent"}}]
                                }]
                            }]
                        }
                    ]
                }]
            }]
        }]));
        let result = resolve_intents(
            &tree,
            &inbounds(json!({
                "showProject": {"semanticObject": "Project", "action": "display"},
                "editComponent": {"semanticObject": "Component", "action": "edit"}
            })),
        );

        assert_eq!(
            result.entity_relative_paths["project"],
            EntityRelativePathEntry {
                path_segment: "/home/projects/:projectId".to_string(),
                parent_entity: Some("global".to_string()),
            }
        );
        assert_eq!(
            result.entity_relative_paths["component"],
            EntityRelativePathEntry {
                path_segment: "/components/:componentId".to_string(),
                parent_entity: Some("project".to_string()),
            }
        );

        let mappings = &result.intent_mappings;
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].base_entity_id, "global.project");
        assert_eq!(mappings[0].relative_path, "/overview");
        assert_eq!(mappings[1].base_entity_id, "global.project.component");
        assert_eq!(mappings[1].relative_path, "/settings/general");
    }

    #[test]
    fn test_composed_entity_parent_id() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "root",
            "children": [{
                "pathSegment": "account",
                "entityType": "tenant",
                "defineEntity": {"id": "account"},
                "children": [{"pathSegment": "team", "defineEntity": {"id": "team"}}]
            }]
        }]));
        let scan = scan_entities(&tree);
        assert_eq!(
            scan.entity_relative_paths["team"].parent_entity.as_deref(),
            Some("tenant.account")
        );
    }

    #[test]
    fn test_global_entity_type_does_not_compose() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "root",
            "defineEntity": {"id": "main"},
            "children": [{"pathSegment": "sub", "defineEntity": {"id": "sub"}}]
        }]));
        let paths = scan_entities(&tree).entity_relative_paths;
        assert_eq!(paths["main"].path_segment, "/root");
        assert_eq!(paths["sub"].parent_entity.as_deref(), Some("main"));
    }

    #[test]
    fn test_unmatched_and_missing_inbounds_are_ignored() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "root",
            "target": {"inboundId": "unknown"}
        }]));
        let result = resolve_intents(&tree, &BTreeMap::new());
        assert_eq!(result.entity_roots, 1);
        assert!(result.intent_mappings.is_empty());
        assert!(result.entity_relative_paths.is_empty());
    }

    #[test]
    fn test_only_entity_typed_roots_are_traversed() {
        let tree = nodes(json!([
            {"pathSegment": "plain", "children": [{"pathSegment": "x", "defineEntity": {"id": "hidden"}}]},
            {"entityType": "global", "pathSegment": "typed", "children": [{"pathSegment": "y", "defineEntity": {"id": "seen"}}]}
        ]));
        let scan = scan_entities(&tree);
        assert_eq!(scan.entity_roots, 1);
        assert!(!scan.entity_relative_paths.contains_key("hidden"));
        assert!(scan.entity_relative_paths.contains_key("seen"));
    }

    #[test]
    fn test_duplicate_entity_id_last_write_wins() {
        let tree = nodes(json!([
            {"entityType": "global", "pathSegment": "first", "children": [{"pathSegment": "a", "defineEntity": {"id": "dup"}}]},
            {"entityType": "global", "pathSegment": "second", "children": [{"pathSegment": "b", "defineEntity": {"id": "dup"}}]}
        ]));
        let paths = scan_entities(&tree).entity_relative_paths;
        assert_eq!(paths.len(), 1);
        assert_eq!(paths["dup"].path_segment, "/second/b");
    }

    #[test]
    fn test_compound_children_are_not_visited() {
        let tree = nodes(json!([{
            "entityType": "global",
            "pathSegment": "root",
            "compound": {"children": [{"defineEntity": {"id": "nope"}, "target": {"inboundId": "in1"}}]}
        }]));
        let result = resolve_intents(
            &tree,
            &inbounds(json!({"in1": {"semanticObject": "S", "action": "A"}})),
        );
        assert!(result.intent_mappings.is_empty());
        assert!(result.entity_relative_paths.is_empty());
    }
}
