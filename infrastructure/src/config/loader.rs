//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "matchmaker";
const PROJECT_FILES: [&str; 2] = ["matchmaker.toml", ".matchmaker.toml"];
const ENV_PREFIX: &str = "MATCHMAKER_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MATCHMAKER_*` environment variables (`__` separates sections,
    ///    e.g. `MATCHMAKER_PROVIDER__CHAT_MODEL`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./matchmaker.toml` or `./.matchmaker.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/matchmaker/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();
        Self::figment(
            global.as_deref(),
            project.as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// File layers without the environment, lowest priority first.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project, explicit].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }
        figment
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/matchmaker/config.toml if set,
    /// otherwise falls back to ~/.config/matchmaker/config.toml
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
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./matchmaker.toml or ./.matchmaker.toml");
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
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.conversation.max_turns, 10);
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("matchmaker"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let global = toml_file(
            r#"
[provider]
chat_model = "global-model"
embedding_model = "global-embed"

[conversation]
max_turns = 12
"#,
        );
        let explicit = toml_file(
            r#"
[provider]
chat_model = "explicit-model"
"#,
        );

        let config: FileConfig =
            ConfigLoader::figment(Some(global.path()), None, Some(explicit.path()))
                .extract()
                .unwrap();

        assert_eq!(config.provider.chat_model, "explicit-model");
        assert_eq!(config.provider.embedding_model, "global-embed");
        assert_eq!(config.conversation.max_turns, 12);
        assert_eq!(config.conversation.closing_grace, 2);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let file = toml_file(
            r#"
[conversation]
max_turns = "many"
"#,
        );
        let result = ConfigLoader::figment(None, Some(file.path()), None).extract::<FileConfig>();
        assert!(result.is_err());
    }
}
