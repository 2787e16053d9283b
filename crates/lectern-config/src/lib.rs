//! Site configuration for Lectern.
//!
//! Parses `lectern.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. A missing file
//! yields the built-in defaults, so every load produces a complete record.
//!
//! The loaded [`Config`] is built once and treated as read-only for the
//! rest of the run.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `project.email`
//! - `project.base_url`
//! - `project.homepage`
//! - `project.repository`
//! - `links.inventories.*.url`

mod expand;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lectern.toml";

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project identity.
    pub project: ProjectConfig,
    /// Theme options (paths are relative strings from TOML).
    theme: ThemeConfigRaw,
    /// Ordered navigation entries.
    pub nav: Vec<NavEntry>,
    /// Build behavior flags (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Cross-project reference targets.
    pub links: LinksConfig,
    /// Social links, label to list of URLs.
    pub social: BTreeMap<String, Vec<String>>,
    /// Open Graph options.
    pub opengraph: OpenGraphConfig,

    /// Resolved theme options (set after loading).
    #[serde(skip)]
    pub theme_resolved: ThemeConfig,
    /// Resolved build flags (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Project identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name shown in page titles and Open Graph tags.
    pub name: String,
    /// Author or owning team.
    pub author: String,
    /// Contact email.
    pub email: Option<String>,
    /// Version string stamped into the generated site.
    pub version: String,
    /// Base URL the site is published under.
    pub base_url: Option<String>,
    /// Homepage URL. Derived from `base_url` when unset.
    pub homepage: Option<String>,
    /// Source repository URL.
    pub repository: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Documentation".to_owned(),
            author: "Documentation Team".to_owned(),
            email: None,
            version: "0.1.0".to_owned(),
            base_url: None,
            homepage: None,
            repository: None,
        }
    }
}

/// Raw theme options as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeConfigRaw {
    name: Option<String>,
    logo: Option<String>,
    favicon: Option<String>,
    show_prev_next: Option<bool>,
    hide_index_toctree: Option<bool>,
    languages: Option<BTreeMap<String, String>>,
    feedback_link: Option<String>,
    static_dirs: Option<Vec<String>>,
    templates_dir: Option<String>,
}

/// Resolved theme options with absolute paths.
#[derive(Debug)]
pub struct ThemeConfig {
    /// Theme name.
    pub name: String,
    /// Logo location relative to the static asset root.
    pub logo: Option<String>,
    /// Favicon location relative to the static asset root.
    pub favicon: Option<String>,
    /// Render previous/next page links.
    pub show_prev_next: bool,
    /// Hide the root table of contents on index pages.
    pub hide_index_toctree: bool,
    /// Supported languages, code to display name.
    pub languages: BTreeMap<String, String>,
    /// Feedback link shown in the page footer.
    pub feedback_link: Option<String>,
    /// Static asset directories.
    pub static_dirs: Vec<PathBuf>,
    /// Template override directory.
    pub templates_dir: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "default".to_owned(),
            logo: None,
            favicon: None,
            show_prev_next: true,
            hide_index_toctree: false,
            languages: default_languages(),
            feedback_link: None,
            static_dirs: vec![PathBuf::from("_static")],
            templates_dir: PathBuf::from("_templates"),
        }
    }
}

fn default_languages() -> BTreeMap<String, String> {
    BTreeMap::from([("en".to_owned(), "English".to_owned())])
}

/// A navigation entry. Entries nest to arbitrary depth for sub-menus.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NavEntry {
    /// Display label.
    pub title: String,
    /// Link target, a site path or an absolute URL.
    pub link: String,
    /// Child entries rendered as a sub-menu.
    #[serde(default)]
    pub children: Vec<NavEntry>,
}

/// Raw build flags as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    strict: Option<bool>,
    extensions: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    locale_dirs: Option<Vec<String>>,
    gettext_compact: Option<bool>,
    epilog_file: Option<String>,
}

/// Resolved build flags with absolute paths.
#[derive(Debug)]
pub struct BuildConfig {
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
    /// Text file appended to every generated page.
    pub epilog_file: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            strict: true,
            extensions: Vec::new(),
            exclude_patterns: vec!["_build".to_owned()],
            locale_dirs: vec![PathBuf::from("locale")],
            gettext_compact: false,
            epilog_file: PathBuf::from("_static/urls.txt"),
        }
    }
}

/// Cross-project reference targets.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LinksConfig {
    /// Object inventories of other projects, name to target.
    pub inventories: BTreeMap<String, InventoryRef>,
}

/// A single cross-project inventory target.
///
/// Serializable because the loaded targets are passed through to the
/// site context verbatim.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct InventoryRef {
    /// Base URL of the target project's documentation.
    pub url: String,
    /// Explicit inventory location. `None` uses the target's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<String>,
}

/// Open Graph protocol options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OpenGraphConfig {
    /// Site name. Defaults to the project name.
    pub site_name: Option<String>,
    /// Site URL. Defaults to the homepage.
    pub site_url: Option<String>,
    /// Base URL for generated social cards. Defaults to the homepage.
    pub social_card_url: Option<String>,
    /// Emit a description meta tag.
    pub enable_meta_description: bool,
}

impl Default for OpenGraphConfig {
    fn default() -> Self {
        Self {
            site_name: None,
            site_url: None,
            social_card_url: None,
            enable_meta_description: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`project.base_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_BASE_URL`} is not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Require a URL field to use the http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http:// or https:// URL"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lectern.toml` in the current directory and
    /// parents, falling back to the built-in defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, or if
    /// parsing, expansion, or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default_with_cwd())
        }
    }

    /// Directory that relative paths and VCS queries are anchored to.
    ///
    /// The config file's directory when loaded from disk, the current
    /// working directory otherwise.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(
                || std::env::current_dir().unwrap_or_default(),
                Path::to_path_buf,
            )
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create a default config with paths relative to the current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create a default config with paths relative to the given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            project: ProjectConfig::default(),
            theme: ThemeConfigRaw::default(),
            nav: Vec::new(),
            build: BuildConfigRaw::default(),
            links: LinksConfig::default(),
            social: BTreeMap::new(),
            opengraph: OpenGraphConfig::default(),
            theme_resolved: ThemeConfig {
                static_dirs: vec![base.join("_static")],
                templates_dir: base.join("_templates"),
                ..ThemeConfig::default()
            },
            build_resolved: BuildConfig {
                locale_dirs: vec![base.join("locale")],
                epilog_file: base.join("_static/urls.txt"),
                ..BuildConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_project()?;
        self.validate_theme()?;
        self.validate_nav()?;
        self.validate_build()?;
        self.validate_links()?;
        Ok(())
    }

    /// Validate project identity.
    fn validate_project(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.project.name, "project.name")?;
        require_non_empty(&self.project.author, "project.author")?;
        require_non_empty(&self.project.version, "project.version")?;

        for (field, value) in [
            ("project.base_url", &self.project.base_url),
            ("project.homepage", &self.project.homepage),
            ("project.repository", &self.project.repository),
        ] {
            if let Some(url) = value {
                require_http_url(url, field)?;
            }
        }

        Ok(())
    }

    /// Validate theme options.
    fn validate_theme(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.theme_resolved.name, "theme.name")?;

        if let Some(ref link) = self.theme_resolved.feedback_link {
            require_http_url(link, "theme.feedback_link")?;
        }

        Ok(())
    }

    /// Validate navigation entries at every nesting depth.
    fn validate_nav(&self) -> Result<(), ConfigError> {
        fn check(entries: &[NavEntry]) -> Result<(), ConfigError> {
            for entry in entries {
                if entry.title.is_empty() {
                    return Err(ConfigError::Validation(
                        "nav entries require a title".to_owned(),
                    ));
                }
                if entry.link.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "nav entry \"{}\" requires a link",
                        entry.title
                    )));
                }
                check(&entry.children)?;
            }
            Ok(())
        }

        check(&self.nav)
    }

    /// Validate build flags.
    fn validate_build(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for ext in &self.build_resolved.extensions {
            require_non_empty(ext, "build.extensions")?;
            if !seen.insert(ext.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "build.extensions lists \"{ext}\" more than once"
                )));
            }
        }
        Ok(())
    }

    /// Validate cross-project reference targets.
    fn validate_links(&self) -> Result<(), ConfigError> {
        for (name, target) in &self.links.inventories {
            let field = format!("links.inventories.{name}.url");
            require_non_empty(&target.url, &field)?;
            require_http_url(&target.url, &field)?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref email) = self.project.email {
            self.project.email = Some(expand::expand_env(email, "project.email")?);
        }
        if let Some(ref url) = self.project.base_url {
            self.project.base_url = Some(expand::expand_env(url, "project.base_url")?);
        }
        if let Some(ref url) = self.project.homepage {
            self.project.homepage = Some(expand::expand_env(url, "project.homepage")?);
        }
        if let Some(ref url) = self.project.repository {
            self.project.repository = Some(expand::expand_env(url, "project.repository")?);
        }

        for (name, target) in &mut self.links.inventories {
            let field = format!("links.inventories.{name}.url");
            target.url = expand::expand_env(&target.url, &field)?;
        }

        Ok(())
    }

    /// Resolve raw sections into their final form, joining relative paths
    /// against the config file's directory and applying defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let theme = &self.theme;
        self.theme_resolved = ThemeConfig {
            name: theme.name.clone().unwrap_or_else(|| "default".to_owned()),
            logo: theme.logo.clone(),
            favicon: theme.favicon.clone(),
            show_prev_next: theme.show_prev_next.unwrap_or(true),
            hide_index_toctree: theme.hide_index_toctree.unwrap_or(false),
            languages: theme.languages.clone().unwrap_or_else(default_languages),
            feedback_link: theme.feedback_link.clone(),
            static_dirs: match &theme.static_dirs {
                Some(dirs) => dirs.iter().map(|d| config_dir.join(d)).collect(),
                None => vec![config_dir.join("_static")],
            },
            templates_dir: config_dir.join(theme.templates_dir.as_deref().unwrap_or("_templates")),
        };

        let build = &self.build;
        self.build_resolved = BuildConfig {
            strict: build.strict.unwrap_or(true),
            extensions: build.extensions.clone().unwrap_or_default(),
            exclude_patterns: build
                .exclude_patterns
                .clone()
                .unwrap_or_else(|| vec!["_build".to_owned()]),
            locale_dirs: match &build.locale_dirs {
                Some(dirs) => dirs.iter().map(|d| config_dir.join(d)).collect(),
                None => vec![config_dir.join("locale")],
            },
            gettext_compact: build.gettext_compact.unwrap_or(false),
            epilog_file: config_dir.join(build.epilog_file.as_deref().unwrap_or("_static/urls.txt")),
        };
    }
}
