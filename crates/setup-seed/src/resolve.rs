//! Template resolution from the user's override directory.

use crate::builtin::{Helper, builtin};
use crate::{TemplateError, Tool};
use setup_core::{FileTemplate, Recipe, UserConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves recipes, replacing built-in templates with user files.
///
/// A file in the user directory named like a template's target (e.g.
/// `.prettierrc`) replaces that template's contents for every recipe that
/// writes it.
#[derive(Debug)]
pub struct TemplateResolver {
    /// User templates directory (~/.config/setup/templates).
    user_dir: Option<PathBuf>,
}

impl TemplateResolver {
    /// Create a resolver with the default user templates directory.
    pub fn new() -> Self {
        let user_dir = dirs::config_dir().map(|d| d.join("setup").join("templates"));
        Self { user_dir }
    }

    /// Create a resolver with a custom user templates directory.
    pub fn with_user_dir(user_dir: Option<PathBuf>) -> Self {
        Self { user_dir }
    }

    /// Use the configured templates directory, or the default one.
    pub fn from_config(config: &UserConfig) -> Self {
        match &config.templates.dir {
            Some(dir) => Self::with_user_dir(Some(expand_home(dir))),
            None => Self::new(),
        }
    }

    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }

    /// Get a tool's recipe with user overrides applied.
    pub fn recipe(&self, tool: Tool) -> Result<Recipe, TemplateError> {
        let mut recipe = builtin(tool);
        for file in &mut recipe.files {
            if let Some(contents) = self.user_template(&file.path)? {
                log::info!("using user template for {}", file.path.display());
                file.contents = contents;
            }
        }
        Ok(recipe)
    }

    /// Get a helper script's file, with user overrides applied.
    pub fn helper(&self, helper: &Helper) -> Result<FileTemplate, TemplateError> {
        let path = PathBuf::from(helper.file);
        let contents = match self.user_template(&path)? {
            Some(contents) => contents,
            None => helper.contents.to_string(),
        };
        Ok(FileTemplate { path, contents })
    }

    /// Names of the override files present in the user directory.
    pub fn overrides(&self) -> Result<Vec<String>, TemplateError> {
        let mut names = Vec::new();
        if let Some(ref user_dir) = self.user_dir
            && user_dir.is_dir()
        {
            let entries = fs::read_dir(user_dir).map_err(|source| TemplateError::Read {
                path: user_dir.clone(),
                source,
            })?;
            for entry in entries.flatten() {
                if entry.path().is_file()
                    && let Some(name) = entry.file_name().to_str()
                {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn user_template(&self, target: &Path) -> Result<Option<String>, TemplateError> {
        let (Some(user_dir), Some(name)) = (&self.user_dir, target.file_name()) else {
            return Ok(None);
        };

        let path = user_dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| TemplateError::Read { path, source })
    }
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PY_HELPERS;

    #[test]
    fn builtin_without_user_dir() {
        let resolver = TemplateResolver::with_user_dir(None);
        let recipe = resolver.recipe(Tool::Prettier).unwrap();
        assert_eq!(recipe, builtin(Tool::Prettier));
        assert!(resolver.overrides().unwrap().is_empty());
    }

    #[test]
    fn user_file_replaces_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".prettierrc"), "{\"semi\": true}\n").unwrap();

        let resolver = TemplateResolver::with_user_dir(Some(dir.path().to_path_buf()));
        for tool in [Tool::Prettier, Tool::Linter] {
            let recipe = resolver.recipe(tool).unwrap();
            let rc = recipe
                .files
                .iter()
                .find(|f| f.path == Path::new(".prettierrc"))
                .unwrap();
            assert_eq!(rc.contents, "{\"semi\": true}\n");
        }

        // Other templates are untouched
        let recipe = resolver.recipe(Tool::Prettier).unwrap();
        assert_eq!(recipe.files[1], builtin(Tool::Prettier).files[1]);
        assert_eq!(resolver.overrides().unwrap(), vec![".prettierrc"]);
    }

    #[test]
    fn helper_override() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = TemplateResolver::with_user_dir(Some(dir.path().to_path_buf()));
        let helper = &PY_HELPERS[0];
        assert_eq!(resolver.helper(helper).unwrap().contents, helper.contents);

        fs::write(dir.path().join("auto_type.py"), "print('mine')\n").unwrap();
        let file = resolver.helper(helper).unwrap();
        assert_eq!(file.path, PathBuf::from("auto_type.py"));
        assert_eq!(file.contents, "print('mine')\n");
    }

    #[test]
    fn missing_user_dir_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = TemplateResolver::with_user_dir(Some(dir.path().join("missing")));
        assert_eq!(resolver.recipe(Tool::Vitest).unwrap(), builtin(Tool::Vitest));
    }

    #[test]
    fn config_dir_is_used() {
        let mut config = UserConfig::default();
        config.templates.dir = Some(PathBuf::from("/srv/templates"));
        let resolver = TemplateResolver::from_config(&config);
        assert_eq!(resolver.user_dir(), Some(Path::new("/srv/templates")));
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_home(Path::new("~/templates"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("templates"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
