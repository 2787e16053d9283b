//! Navigation tree for UI presentation.

use lectern_config::NavEntry;
use serde::Serialize;

/// Navigation item with children for the UI tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target path or URL.
    pub path: String,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Convert configured navigation entries into the UI tree.
///
/// Entry order and nesting are preserved as configured.
#[must_use]
pub fn nav_tree(entries: &[NavEntry]) -> Vec<NavItem> {
    entries
        .iter()
        .map(|entry| NavItem {
            title: entry.title.clone(),
            path: entry.link.clone(),
            children: nav_tree(&entry.children),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(title: &str, link: &str, children: Vec<NavEntry>) -> NavEntry {
        NavEntry {
            title: title.to_owned(),
            link: link.to_owned(),
            children,
        }
    }

    #[test]
    fn test_nav_tree_empty() {
        assert!(nav_tree(&[]).is_empty());
    }

    #[test]
    fn test_nav_tree_preserves_order() {
        let entries = vec![
            entry("About", "about-us", Vec::new()),
            entry("Get Involved", "getting-involved", Vec::new()),
            entry("Yearbook", "meet-the-team", Vec::new()),
        ];

        let items = nav_tree(&entries);

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["About", "Get Involved", "Yearbook"]);
        assert_eq!(items[2].path, "meet-the-team");
    }

    #[test]
    fn test_nav_tree_nested_children() {
        let entries = vec![entry(
            "Guides",
            "guides",
            vec![entry(
                "Setup",
                "guides/setup",
                vec![entry("Linux", "guides/setup/linux", Vec::new())],
            )],
        )];

        let items = nav_tree(&entries);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].children[0].path, "guides/setup/linux");
    }

    #[test]
    fn test_nav_item_serialization_skips_empty_children() {
        let items = nav_tree(&[entry("About", "about-us", Vec::new())]);
        let json = serde_json::to_value(&items).unwrap();

        assert_eq!(json[0]["title"], "About");
        assert_eq!(json[0]["path"], "about-us");
        assert!(json[0].get("children").is_none());
    }
}
