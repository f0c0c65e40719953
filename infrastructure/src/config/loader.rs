//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agent-forum";
const PROJECT_FILES: [&str; 2] = ["forum.toml", ".forum.toml"];
const ENV_PREFIX: &str = "FORUM_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `FORUM_<SECTION>__<KEY>` (e.g. `FORUM_QUORUM__THRESHOLD`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./forum.toml` or `./.forum.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agent-forum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global
            && path.exists()
        {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }

        // An explicit path that does not exist is an error, not a silent no-op
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agent-forum/config.toml if set,
    /// otherwise falls back to ~/.config/agent-forum/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./forum.toml or ./.forum.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.quorum.min_participants, 3);
        assert_eq!(config.execution.max_retries, 3);
        assert!(config.logging.event_log.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains(APP_DIR));
    }

    #[test]
    fn test_project_overrides_global() {
        let global = toml_file("[quorum]\nthreshold = 0.7\nmin_participants = 5\n");
        let project = toml_file("[quorum]\nmin_participants = 2\n");

        let config: FileConfig =
            ConfigLoader::figment(Some(global.path()), Some(project.path()), None)
                .extract()
                .unwrap();

        assert_eq!(config.quorum.threshold, 0.7);
        assert_eq!(config.quorum.min_participants, 2);
        assert_eq!(config.quorum.timeout_minutes, 60);
    }

    #[test]
    fn test_explicit_overrides_project() {
        let project = toml_file("[execution]\nchain_id = 10\nparallel = true\n");
        let explicit = toml_file("[execution]\nchain_id = 8453\n");

        let config: FileConfig =
            ConfigLoader::figment(None, Some(project.path()), Some(explicit.path()))
                .extract()
                .unwrap();

        assert_eq!(config.execution.chain_id, 8453);
        assert!(config.execution.parallel);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let result: Result<FileConfig, _> =
            ConfigLoader::figment(None, None, Some(Path::new("/nonexistent/forum.toml")))
                .extract();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_global_is_skipped() {
        let config: FileConfig =
            ConfigLoader::figment(Some(Path::new("/nonexistent/config.toml")), None, None)
                .extract()
                .unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
