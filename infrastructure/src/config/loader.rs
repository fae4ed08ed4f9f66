//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for environment overrides, e.g. `WORKBENCH_AGENT__MAX_TURNS=5`
pub const ENV_PREFIX: &str = "WORKBENCH_";

const PROJECT_FILENAMES: [&str; 2] = ["workbench.toml", ".workbench.toml"];

/// One place configuration may come from, for `--show-config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables `WORKBENCH_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./workbench.toml` or `./.workbench.toml`
    /// 4. Global: `~/.config/workbench/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::layered(config_path, ENV_PREFIX)
            .extract()
            .map_err(Box::new)
    }

    fn layered(config_path: Option<&PathBuf>, env_prefix: &str) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!(path = %global_path.display(), "Loading global config");
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!(path = %project_path.display(), "Loading project config");
            figment = figment.merge(Toml::file(&project_path));
        }

        // Explicit file must exist; a typo should not silently fall back
        if let Some(path) = config_path {
            debug!(path = %path.display(), "Loading explicit config");
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(env_prefix).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path (`~/.config/workbench/config.toml`)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("workbench").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILENAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// List the configuration sources in priority order
    pub fn config_sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = Vec::new();

        let env_found = std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX));
        sources.push(ConfigSource {
            label: "Env",
            location: format!("{}<SECTION>__<KEY>", ENV_PREFIX),
            found: env_found,
        });

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        match Self::project_config_path() {
            Some(path) => sources.push(ConfigSource {
                label: "Project",
                location: path.display().to_string(),
                found: true,
            }),
            None => sources.push(ConfigSource {
                label: "Project",
                location: "./workbench.toml or ./.workbench.toml".to_string(),
                found: false,
            }),
        }

        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                label: "Global",
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(ConfigSource {
            label: "Default",
            location: "built-in defaults".to_string(),
            found: true,
        });

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.max_turns, 20);
        assert_eq!(config.sandbox.script.extension, "py");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("workbench/config.toml"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "[agent]\nmax_turns = 4\n\n[sandbox.script]\ninterpreter = \"sh\"\n",
        )
        .unwrap();

        let config = ConfigLoader::layered(Some(&path), "WORKBENCH_TEST_NONE_")
            .extract::<FileConfig>()
            .unwrap();

        assert_eq!(config.agent.max_turns, 4);
        assert_eq!(config.sandbox.script.interpreter, "sh");
        // Untouched keys keep their defaults
        assert_eq!(config.sandbox.script.extension, "py");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(
            ConfigLoader::layered(Some(&path), "WORKBENCH_TEST_NONE_")
                .extract::<FileConfig>()
                .is_err()
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[agent]\nmax_turns = 4\n").unwrap();

        // SAFETY: the prefix is unique to this test
        unsafe { std::env::set_var("WORKBENCH_TEST_LOADER_AGENT__MAX_TURNS", "9") };
        let config = ConfigLoader::layered(Some(&path), "WORKBENCH_TEST_LOADER_")
            .extract::<FileConfig>()
            .unwrap();
        unsafe { std::env::remove_var("WORKBENCH_TEST_LOADER_AGENT__MAX_TURNS") };

        assert_eq!(config.agent.max_turns, 9);
    }

    #[test]
    fn test_config_sources_lists_explicit_path() {
        let sources = ConfigLoader::config_sources(Some(Path::new("/nonexistent/wb.toml")));
        let explicit = sources.iter().find(|s| s.label == "Explicit").unwrap();
        assert!(!explicit.found);
        assert_eq!(sources.last().unwrap().label, "Default");
    }
}
