//! Extended-data merger
//!
//! Overlays a provider's help context, breadcrumb badge and completeness
//! flag onto every node the provider contributes, at every depth.

use serde_json::Value;

use crate::model::{ExtendedData, ResolvedNode};

const EXTENSION_CLASS_NAME_KEY: &str = "extensionClassName";

/// Apply `extended` to `node` and all of its descendants.
///
/// The node's context is layered over the provider's `nodeContext`, so a
/// node's own keys win. `extensionClassName` is only added for providers
/// flagged as missing mandatory data; the shell uses it to link to the
/// extension's setup page.
pub fn apply_extended_data(mut node: ResolvedNode, extended: &ExtendedData) -> ResolvedNode {
    node.is_missing_mandatory_data = extended.is_missing_mandatory_data;
    node.help_context = extended.help_context.clone();
    node.breadcrumb_badge = extended.breadcrumb_badge.clone();

    let mut context = extended.node_context.clone().unwrap_or_default();
    context.extend(node.context.take().unwrap_or_default());
    if extended.missing_mandatory_data() {
        if let Some(class_name) = &extended.extension_class_name {
            context.insert(
                EXTENSION_CLASS_NAME_KEY.to_string(),
                Value::String(class_name.clone()),
            );
        }
    }
    node.context = Some(context);

    node.children = node.children.map(|children| {
        children
            .into_iter()
            .map(|child| apply_extended_data(child, extended))
            .collect()
    });
    node
}
