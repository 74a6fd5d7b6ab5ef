use crate::constants;
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub omdb: OmdbConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_DB_PATH),
        }
    }
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_OMDB_BASE_URL.to_string(),
            timeout_seconds: constants::DEFAULT_OMDB_TIMEOUT_SECONDS,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(constants::DEFAULT_TEMPLATE_PATH),
            output_path: PathBuf::from(constants::DEFAULT_PAGE_OUTPUT_PATH),
            title: constants::DEFAULT_SITE_TITLE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            Self::load_from(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicitly named file; a missing file is an error.
    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CatalogError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.database.path, PathBuf::from("data/movies.db"));
        assert_eq!(config.omdb.timeout_seconds, 10);
        assert_eq!(config.site.title, "MOVIE-DB");
    }

    #[test]
    fn partial_sections_override_only_given_fields() {
        let config = Config::from_toml(
            r#"
            [database]
            path = "/tmp/catalog.db"

            [site]
            title = "My Movies"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/tmp/catalog.db"));
        assert_eq!(config.site.title, "My Movies");
        assert_eq!(config.site.output_path, PathBuf::from("_static/index.html"));
        assert_eq!(config.omdb.base_url, "http://www.omdbapi.com/");
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let err = Config::load_from("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(Config::from_toml("[omdb\n"), Err(CatalogError::Toml(_))));
    }
}
