//! Configuration management for `lit`.
//!
//! Configuration is loaded from YAML files with support for:
//! - Workspace config (`.lit/config.yaml`, found by walking up)
//! - User config (`~/.config/lit/config.yaml`)
//! - Environment and flag overrides (`LIT_USER`, `LIT_LAYOUT`, `VISUAL`, `EDITOR`)
//!
//! Everything is resolved once into [`Settings`] before a command runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lit_lib::stamp::check_actor;
use lit_lib::store::{Layout, StoreConfig, TRACKER_DIR};
use serde::{Deserialize, Serialize};

/// Name of the config file inside `.lit/` and the user config directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Written by `lit init` next to the issue file.
pub const CONFIG_TEMPLATE: &str = r"# lit configuration
# actor: ada@example.com
# editor: vim
# layout: tracker
";

/// One config file's worth of settings. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub actor: Option<String>,
    pub editor: Option<String>,
    pub layout: Option<Layout>,
}

impl Config {
    /// Parse config YAML. An empty or comment-only file is the default config.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        }) {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a config file, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::from_yaml(&text).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// Layer `over` on top of `self`; keys set in `over` win.
    #[must_use]
    pub fn merge(self, over: Self) -> Self {
        Self {
            actor: over.actor.or(self.actor),
            editor: over.editor.or(self.editor),
            layout: over.layout.or(self.layout),
        }
    }
}

/// Values taken from flags and the environment at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--actor` / `LIT_USER`
    pub actor: Option<String>,
    /// `--layout` / `LIT_LAYOUT`
    pub layout: Option<Layout>,
    /// `VISUAL`, else `EDITOR`
    pub editor: Option<String>,
}

impl CliOverrides {
    /// Editor command from the environment, if any.
    #[must_use]
    pub fn editor_from_env() -> Option<String> {
        ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub actor: String,
    pub editor: Option<String>,
    pub layout: Layout,
    pub start_dir: PathBuf,
}

impl Settings {
    /// Combine overrides, workspace config, and user config, in that order
    /// of precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen actor cannot appear in a stamp.
    pub fn resolve(
        start_dir: PathBuf,
        overrides: CliOverrides,
        workspace: Option<Config>,
        user: Option<Config>,
    ) -> Result<Self> {
        let file = user
            .unwrap_or_default()
            .merge(workspace.unwrap_or_default());
        let actor = overrides
            .actor
            .filter(|actor| !actor.is_empty())
            .or(file.actor)
            .unwrap_or_else(default_actor);
        check_actor(&actor)?;
        Ok(Self {
            actor,
            editor: overrides.editor.or(file.editor),
            layout: overrides.layout.or(file.layout).unwrap_or_default(),
            start_dir,
        })
    }

    /// Read config files and resolve settings for `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but is invalid.
    pub fn load(start_dir: &Path, overrides: CliOverrides) -> Result<Self> {
        let start_dir = dunce::canonicalize(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());
        let workspace = match find_workspace_config(&start_dir) {
            Some(path) => Config::load(&path)?,
            None => None,
        };
        let user = match user_config_path() {
            Some(path) => Config::load(&path)?,
            None => None,
        };
        Self::resolve(start_dir, overrides, workspace, user)
    }

    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.start_dir, self.layout)
    }
}

/// `<config_dir>/lit/config.yaml`
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lit").join(CONFIG_FILE))
}

/// Find `.lit/config.yaml` in `start` or the nearest ancestor that has one.
#[must_use]
pub fn find_workspace_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(TRACKER_DIR).join(CONFIG_FILE))
        .find(|path| path.is_file())
}

/// `user@host`, from the environment.
#[must_use]
pub fn default_actor() -> String {
    let user = ["USER", "USERNAME", "LOGNAME"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "?".to_string());
    match hostname() {
        Some(host) => format!("{user}@{host}"),
        None => user,
    }
}

fn hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| fs::read_to_string("/etc/hostname").ok())
        .map(|host| host.trim().to_string())
        .filter(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(actor: Option<&str>, editor: Option<&str>, layout: Option<Layout>) -> Config {
        Config {
            actor: actor.map(str::to_string),
            editor: editor.map(str::to_string),
            layout,
        }
    }

    #[test]
    fn test_parse_yaml() {
        let parsed = Config::from_yaml("actor: ada@lab\nlayout: flat\n").unwrap();
        assert_eq!(parsed, config(Some("ada@lab"), None, Some(Layout::Flat)));
    }

    #[test]
    fn test_template_is_empty_config() {
        assert_eq!(Config::from_yaml(CONFIG_TEMPLATE).unwrap(), Config::default());
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Config::from_yaml("colour: blue\n").is_err());
        assert!(Config::from_yaml("layout: sideways\n").is_err());
    }

    #[test]
    fn test_precedence() {
        let user = config(Some("user"), Some("nano"), Some(Layout::Flat));
        let workspace = config(Some("workspace"), None, None);

        let settings = Settings::resolve(
            PathBuf::from("/tmp"),
            CliOverrides::default(),
            Some(workspace.clone()),
            Some(user.clone()),
        )
        .unwrap();
        assert_eq!(settings.actor, "workspace");
        assert_eq!(settings.editor.as_deref(), Some("nano"));
        assert_eq!(settings.layout, Layout::Flat);

        let overrides = CliOverrides {
            actor: Some("flag".into()),
            layout: Some(Layout::Tracker),
            editor: Some("vi".into()),
        };
        let settings =
            Settings::resolve(PathBuf::from("/tmp"), overrides, Some(workspace), Some(user))
                .unwrap();
        assert_eq!(settings.actor, "flag");
        assert_eq!(settings.editor.as_deref(), Some("vi"));
        assert_eq!(settings.layout, Layout::Tracker);
    }

    #[test]
    fn test_defaults() {
        let settings =
            Settings::resolve(PathBuf::from("/tmp"), CliOverrides::default(), None, None).unwrap();
        assert_eq!(settings.layout, Layout::Tracker);
        assert!(settings.editor.is_none());
        assert!(!settings.actor.is_empty());
    }

    #[test]
    fn test_actor_with_newline_is_rejected() {
        let overrides = CliOverrides {
            actor: Some("bob\nevil".into()),
            ..CliOverrides::default()
        };
        let err = Settings::resolve(PathBuf::from("/tmp"), overrides, None, None).unwrap_err();
        assert!(err.to_string().contains("actor"), "{err}");

        let workspace = config(Some("  padded"), None, None);
        assert!(
            Settings::resolve(PathBuf::from("/tmp"), CliOverrides::default(), Some(workspace), None)
                .is_err()
        );
    }

    #[test]
    fn test_find_workspace_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let lit_dir = dir.path().join(TRACKER_DIR);
        fs::create_dir_all(&lit_dir).unwrap();
        fs::write(lit_dir.join(CONFIG_FILE), "editor: ed\n").unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = find_workspace_config(&nested).unwrap();
        assert_eq!(found, lit_dir.join(CONFIG_FILE));
        let loaded = Config::load(&found).unwrap().unwrap();
        assert_eq!(loaded.editor.as_deref(), Some("ed"));
    }
}
