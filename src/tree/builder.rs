//! Node tree builder
//!
//! Turns the authored node list of one fragment into `ResolvedNode`s:
//! fragment defaults are merged into every node, then each node gets its
//! `viewUrl` and `viewGroup`. Compound children only get a `viewUrl`.

use tracing::warn;
use url::Url;

use crate::model::resolved::RESERVED_KEYS;
use crate::model::{
    Compound, NodeDefaults, RawNode, ResolvedCompound, ResolvedCompoundChild, ResolvedNode,
};

/// Builds resolved nodes for one fragment
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder<'a> {
    defaults: Option<&'a NodeDefaults>,
    url_template_url: &'a str,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(defaults: Option<&'a NodeDefaults>, url_template_url: &'a str) -> Self {
        Self {
            defaults,
            url_template_url,
        }
    }

    pub fn build(&self, nodes: Vec<RawNode>) -> Vec<ResolvedNode> {
        nodes.into_iter().map(|n| self.resolve_node(n)).collect()
    }

    fn resolve_node(&self, raw: RawNode) -> ResolvedNode {
        let node = match self.defaults {
            Some(defaults) => raw.with_defaults(defaults),
            None => raw,
        };

        let view_group = resolve_view_group(&node, self.url_template_url);
        let view_url = resolve_view_url(
            node.url.as_deref(),
            node.url_suffix.as_deref(),
            self.url_template_url,
        );
        let compound = node.compound.map(|c| self.resolve_compound(c));
        // Defaults are fragment-scoped: every child merges the same defaults again
        let children = node.children.map(|children| self.build(children));

        let mut extra = node.extra;
        for key in RESERVED_KEYS {
            extra.remove(*key);
        }

        ResolvedNode {
            path_segment: node.path_segment,
            label: node.label,
            url: node.url,
            url_suffix: node.url_suffix,
            view_url,
            view_group,
            isolate_view: node.isolate_view,
            entity_type: node.entity_type,
            define_entity: node.define_entity,
            target: node.target,
            context: node.context,
            children,
            compound,
            extra,
            ..Default::default()
        }
    }

    fn resolve_compound(&self, compound: Compound) -> ResolvedCompound {
        let children = compound.children.map(|children| {
            children
                .into_iter()
                .map(|child| {
                    let mut extra = child.extra;
                    extra.remove("viewUrl");
                    ResolvedCompoundChild {
                        view_url: resolve_view_url(
                            child.url.as_deref(),
                            child.url_suffix.as_deref(),
                            self.url_template_url,
                        ),
                        url: child.url,
                        url_suffix: child.url_suffix,
                        extra,
                    }
                })
                .collect()
        });

        ResolvedCompound {
            children,
            extra: compound.extra,
        }
    }
}

/// View group priority: explicit value, then the fragment's template URL for
/// non-isolated nodes with a URL, then the origin of an absolute `url`.
pub fn resolve_view_group(node: &RawNode, url_template_url: &str) -> Option<String> {
    if let Some(explicit) = non_empty(node.view_group.as_deref()) {
        return Some(explicit.to_string());
    }

    let url = non_empty(node.url.as_deref());
    let has_url = url.is_some() || non_empty(node.url_suffix.as_deref()).is_some();
    if !url_template_url.is_empty() && has_url && !node.is_isolated() {
        return Some(url_template_url.to_string());
    }

    url.and_then(|u| match url_origin(u) {
        Ok(origin) => origin,
        Err(e) => {
            warn!(url = u, error = %e, "Cannot derive view group from node url");
            None
        }
    })
}

/// `url` wins verbatim; otherwise `urlSuffix` is appended to the template URL
pub fn resolve_view_url(
    url: Option<&str>,
    url_suffix: Option<&str>,
    url_template_url: &str,
) -> Option<String> {
    if let Some(url) = non_empty(url) {
        return Some(url.to_string());
    }
    match non_empty(url_suffix) {
        Some(suffix) if !url_template_url.is_empty() => {
            Some(format!("{}{}", url_template_url, suffix))
        }
        _ => None,
    }
}

/// Origin of an absolute URL; `Ok(None)` for URLs with an opaque origin
pub fn url_origin(url: &str) -> Result<Option<String>, url::ParseError> {
    let parsed = Url::parse(url)?;
    let origin = parsed.origin();
    Ok(origin.is_tuple().then(|| origin.ascii_serialization()))
}

/// True when `url` parses as an absolute URL
pub fn is_absolute_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
