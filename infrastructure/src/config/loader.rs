//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["synclab.toml", ".synclab.toml"];
const ENV_PREFIX: &str = "SYNCLAB_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `SYNCLAB_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./synclab.toml` or `./.synclab.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/synclab/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Self::env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Built-in defaults plus environment overrides, no files (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env_provider())
            .extract()
            .map_err(Box::new)
    }

    fn env_provider() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/synclab/config.toml if set,
    /// otherwise falls back to the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("synclab").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}* variables", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./synclab.toml or ./.synclab.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("synclab"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "synclab.toml",
                r#"
[orchestration]
turn_window = 4

[sync]
debounce_ms = 1000
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.orchestration.turn_window, 4);
            assert_eq!(config.orchestration.reconcile_window, 40);
            assert_eq!(config.sync.debounce_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".synclab.toml", "[provider]\nmodel = \"project\"")?;
            jail.create_file("custom.toml", "[provider]\nmodel = \"explicit\"")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.provider.model, "explicit");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("synclab.toml", "[sync]\nedit_threshold = 8")?;
            jail.set_env("SYNCLAB_SYNC__EDIT_THRESHOLD", "2");
            jail.set_env("SYNCLAB_PROVIDER__MODEL", "from-env");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.sync.edit_threshold, 2);
            assert_eq!(config.provider.model, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_defaults_ignores_files() {
        Jail::expect_with(|jail| {
            jail.create_file("synclab.toml", "[orchestration]\nturn_window = 3")?;

            let config = ConfigLoader::load_defaults().map_err(|e| *e)?;
            assert_eq!(config, FileConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_agents_array_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "synclab.toml",
                r#"
[[agents]]
role = "architect"

[[agents]]
role = "critic"
muted = true
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.agents.len(), 2);
            assert!(config.agents[1].muted);
            Ok(())
        });
    }
}
