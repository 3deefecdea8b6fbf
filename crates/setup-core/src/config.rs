//! User configuration from ~/.config/setup/config.toml

use crate::pm::{PackageManager, ResolveError, Resolver, parse_order};
use serde::Deserialize;
use std::path::PathBuf;

/// User configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserConfig {
    /// Package manager selection.
    pub package_manager: PackageManagerConfig,
    /// `.gitignore` template source.
    pub gitignore: GitignoreConfig,
    /// Config template overrides.
    pub templates: TemplatesConfig,
}

/// Package manager selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PackageManagerConfig {
    /// Manager to try first.
    pub prefer: Option<String>,
    /// Full priority order, replacing the built-in one.
    pub order: Option<Vec<String>>,
}

/// Where `.gitignore` templates come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GitignoreConfig {
    /// Raw file base URL; template paths are appended.
    pub base_url: String,
    /// Git tree listing used to discover template names.
    pub index_url: String,
}

impl Default for GitignoreConfig {
    fn default() -> Self {
        Self {
            base_url: crate::gitignore::DEFAULT_BASE_URL.to_string(),
            index_url: crate::gitignore::DEFAULT_INDEX_URL.to_string(),
        }
    }
}

/// Template override location.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory of files that replace built-in templates of the same name.
    pub dir: Option<PathBuf>,
}

impl UserConfig {
    /// Load user config from default path (~/.config/setup/config.toml).
    pub fn load() -> Self {
        Self::from_path(Self::default_path()).unwrap_or_default()
    }

    /// Load user config from a specific path.
    pub fn from_path(path: Option<PathBuf>) -> Option<Self> {
        let path = path?;
        let contents = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("ignoring invalid config {}: {e}", path.display());
                None
            }
        }
    }

    /// Get the default config path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("setup").join("config.toml"))
    }

    /// Build a resolver from the configured order and preference.
    ///
    /// `cli_prefer` takes precedence over the configured preference.
    pub fn resolver(&self, cli_prefer: Option<PackageManager>) -> Result<Resolver, ResolveError> {
        let mut resolver = Resolver::new();
        if let Some(order) = &self.package_manager.order {
            resolver = resolver.with_order(parse_order(order)?);
        }

        let prefer = match cli_prefer {
            Some(pm) => Some(pm),
            None => self
                .package_manager
                .prefer
                .as_deref()
                .map(|id| {
                    PackageManager::from_id(id)
                        .ok_or_else(|| ResolveError::UnknownManager(id.to_string()))
                })
                .transpose()?,
        };
        if let Some(pm) = prefer {
            resolver = resolver.prefer(pm);
        }

        Ok(resolver)
    }
}
