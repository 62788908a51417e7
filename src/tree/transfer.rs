//! Transfer-node propagation
//!
//! Collects the fragment-wide settings that the shell reads from a
//! fragment's first node: preload URL, iframe permissions and user
//! settings groups.

use crate::model::{ConfigurationFragment, RootSideChannel, UserSettingsConfig};

use super::builder::is_absolute_url;

/// Side channel for `fragment`, with relative URLs anchored at `url_template_url`
pub fn transfer_side_channel(
    fragment: &ConfigurationFragment,
    url_template_url: &str,
) -> RootSideChannel {
    let view_group = fragment.view_group.as_ref();

    let preload_url = view_group
        .and_then(|vg| vg.preload_suffix.as_deref())
        .filter(|suffix| !suffix.is_empty() && !url_template_url.is_empty())
        .map(|suffix| format!("{}{}", url_template_url, suffix));

    RootSideChannel {
        preload_url,
        required_iframe_permissions: view_group
            .and_then(|vg| vg.required_iframe_permissions.clone()),
        user_settings_config: fragment
            .user_settings
            .clone()
            .map(|settings| anchor_user_settings(settings, url_template_url)),
        ..Default::default()
    }
}

fn anchor_user_settings(
    mut settings: UserSettingsConfig,
    url_template_url: &str,
) -> UserSettingsConfig {
    for group in settings.groups.iter_mut().flat_map(|g| g.values_mut()) {
        if let Some(view_url) = group.view_url.as_mut() {
            if !is_absolute_url(view_url) {
                *view_url = format!("{}{}", url_template_url, view_url);
            }
        }
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: serde_json::Value) -> ConfigurationFragment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_preload_and_permissions() {
        let f = fragment(json!({
            "nodes": [],
            "viewGroup": {
                "preloadSuffix": "/#/preload",
                "requiredIFramePermissions": {"allow": ["clipboard-read"], "sandbox": ["allow-forms"]}
            }
        }));
        let side = transfer_side_channel(&f, "https://mfe.example.com");
        assert_eq!(
            side.preload_url.as_deref(),
            Some("https://mfe.example.com/#/preload")
        );
        let permissions = json!({"allow": ["clipboard-read"], "sandbox": ["allow-forms"]});
        assert_eq!(side.required_iframe_permissions, Some(permissions));
        assert!(side.user_settings_config.is_none());
    }

    #[test]
    fn test_preload_requires_template() {
        let authored = json!({"nodes": [], "viewGroup": {"preloadSuffix": "/preload"}});
        let f = fragment(authored);
        assert!(transfer_side_channel(&f, "").preload_url.is_none());
    }

    #[test]
    fn test_user_settings_urls_are_anchored() {
        let f = fragment(json!({
            "nodes": [],
            "userSettings": {
                "groups": {
                    "account": {"label": "Account", "viewUrl": "/settings/account"},
                    "theme": {"label": "Theme", "viewUrl": "https://themes.example.com/ui"},
                    "plain": {"label": "Plain", "settings": {"x": {"type": "string"}}}
                }
            }
        }));
        let side = transfer_side_channel(&f, "https://mfe.example.com");
        let groups = side.user_settings_config.unwrap().groups.unwrap();
        assert_eq!(
            groups["account"].view_url.as_deref(),
            Some("https://mfe.example.com/settings/account")
        );
        assert_eq!(
            groups["theme"].view_url.as_deref(),
            Some("https://themes.example.com/ui")
        );
        assert!(groups["plain"].view_url.is_none());
        assert_eq!(groups["plain"].extra["label"], json!("Plain"));
    }
}
