//! Immutable site context assembly.
//!
//! [`SiteContext::build`] merges the loaded configuration with the two
//! dynamic inputs of a site build: the epilog text file appended to every
//! generated page, and the last-updated date taken from version control.
//! The resulting record is the complete input of the rendering pipeline
//! and is never mutated after assembly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Datelike;
use lectern_config::{Config, InventoryRef};
use serde::Serialize;

use crate::nav::{NavItem, nav_tree};

/// Error returned when site context assembly fails.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Epilog file could not be read.
    #[error("Failed to read epilog file {}: {source}", .path.display())]
    Epilog {
        /// Resolved path of the epilog file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Theme options passed through to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeContext {
    /// Theme name.
    pub name: String,
    /// Logo location relative to the static asset root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Favicon location relative to the static asset root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Render previous/next page links.
    pub show_prev_next: bool,
    /// Hide the root table of contents on index pages.
    pub hide_index_toctree: bool,
    /// Supported languages, code to display name.
    pub languages: BTreeMap<String, String>,
}

/// Open Graph metadata with config gaps filled from project identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    /// Site name.
    pub site_name: String,
    /// Site URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Base URL for generated social cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_card_url: Option<String>,
    /// Emit a description meta tag.
    pub enable_meta_description: bool,
}

/// Build flags passed through to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildContext {
    /// Treat unresolved references as errors.
    pub strict: bool,
    /// Extension names loaded by the build, in order.
    pub extensions: Vec<String>,
    /// Source patterns excluded from the build.
    pub exclude_patterns: Vec<String>,
    /// Translation catalog directories.
    pub locale_dirs: Vec<PathBuf>,
    /// Produce one catalog per source file instead of per directory.
    pub gettext_compact: bool,
    /// Cross-project inventory targets.
    pub inventories: BTreeMap<String, InventoryRef>,
}

/// The read-only record handed to the rendering pipeline.
///
/// Assembled once per build. Static fields come straight from the
/// configuration; `last_updated` and the copyright year are the only
/// fields that can differ between two builds of the same site.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteContext {
    /// Site title.
    pub title: String,
    /// Author or owning team.
    pub author: String,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Version string stamped into the generated site.
    pub version: String,
    /// Copyright line, current year plus author.
    pub copyright: String,
    /// Base URL the site is published under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Homepage URL, configured or derived from the base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Source repository URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// License file URL inside the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    /// Feedback link shown in the page footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_link: Option<String>,
    /// Date of the most recent commit, `None` when unavailable.
    pub last_updated: Option<String>,
    /// Theme options.
    pub theme: ThemeContext,
    /// Navigation tree, order as configured.
    pub nav: Vec<NavItem>,
    /// Social links, label to list of URLs.
    pub social: BTreeMap<String, Vec<String>>,
    /// Open Graph metadata.
    pub opengraph: OpenGraph,
    /// Build flags.
    pub build: BuildContext,
    /// Text fragment appended to every generated page.
    pub epilog: String,
}

impl SiteContext {
    /// Assemble the site context from a loaded configuration.
    ///
    /// Reads the epilog file, queries version control for the last-updated
    /// date (best-effort), and fills derived fields. The epilog read is the
    /// only fallible step.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Epilog`] if the epilog file is missing or
    /// unreadable.
    pub fn build(config: &Config) -> Result<Self, ContextError> {
        let epilog_path = &config.build_resolved.epilog_file;
        let mut epilog = String::new();
        let appendix =
            std::fs::read_to_string(epilog_path).map_err(|source| ContextError::Epilog {
                path: epilog_path.clone(),
                source,
            })?;
        epilog.push_str(&appendix);

        let last_updated = lectern_vcs::last_updated(&config.base_dir());

        let project = &config.project;
        let theme = &config.theme_resolved;

        let homepage = project.homepage.clone().or_else(|| {
            project
                .base_url
                .as_ref()
                .map(|base| format!("{}/{}/", base.trim_end_matches('/'), slug(&project.name)))
        });
        let license_url = project
            .repository
            .as_ref()
            .map(|repo| format!("{repo}/blob/main/LICENSE"));
        let feedback_link = theme.feedback_link.clone().or_else(|| {
            project
                .repository
                .as_ref()
                .map(|repo| format!("{repo}/discussions/new?category=thoughts-and-feedbacks"))
        });

        let opengraph = OpenGraph {
            site_name: config
                .opengraph
                .site_name
                .clone()
                .unwrap_or_else(|| project.name.clone()),
            site_url: config.opengraph.site_url.clone().or_else(|| homepage.clone()),
            social_card_url: config
                .opengraph
                .social_card_url
                .clone()
                .or_else(|| homepage.clone()),
            enable_meta_description: config.opengraph.enable_meta_description,
        };

        let year = chrono::Local::now().year();

        tracing::debug!(
            project = %project.name,
            last_updated = last_updated.as_deref().unwrap_or("unavailable"),
            "assembled site context"
        );

        Ok(Self {
            title: project.name.clone(),
            author: project.author.clone(),
            email: project.email.clone(),
            version: project.version.clone(),
            copyright: format!("{year}, {}.", project.author),
            base_url: project.base_url.clone(),
            homepage,
            repository: project.repository.clone(),
            license_url,
            feedback_link,
            last_updated,
            theme: ThemeContext {
                name: theme.name.clone(),
                logo: theme.logo.clone(),
                favicon: theme.favicon.clone(),
                show_prev_next: theme.show_prev_next,
                hide_index_toctree: theme.hide_index_toctree,
                languages: theme.languages.clone(),
            },
            nav: nav_tree(&config.nav),
            social: config.social.clone(),
            opengraph,
            build: BuildContext {
                strict: config.build_resolved.strict,
                extensions: config.build_resolved.extensions.clone(),
                exclude_patterns: config.build_resolved.exclude_patterns.clone(),
                locale_dirs: config.build_resolved.locale_dirs.clone(),
                gettext_compact: config.build_resolved.gettext_compact,
                inventories: config.links.inventories.clone(),
            },
            epilog,
        })
    }
}

/// Lowercase URL segment for a project name ("Field Atlas" becomes "field-atlas").
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_owned()
}
