use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Configuration file structure that mirrors CLI arguments
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Content type: html or markdown
    pub content_type: Option<String>,

    /// SEO metadata file
    pub metadata: Option<String>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Check that every extracted link is reachable
    pub validate_urls: Option<bool>,

    /// Number of concurrent link checks
    pub concurrency: Option<usize>,

    /// Rate limit for link checks per second
    pub rate_limit: Option<f64>,

    /// Per-link timeout in seconds
    pub timeout: Option<u64>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

/// Reads any serde type from a JSON, TOML, or YAML file, picking the parser by
/// extension.
pub fn load_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let format = ConfigFormat::from_path(path)
        .with_context(|| format!("Unsupported file format: {}", path.display()))?;

    let value = match format {
        ConfigFormat::Json => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))?,
        ConfigFormat::Toml => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML: {}", path.display()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))?,
    };

    Ok(value)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        load_structured(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Check current directory first (highest priority)
        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("defang-seo.{}", ext)));
            }
        }

        // Check user config directory (~/.config/defang-seo)
        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .and_then(|p| {
                if p.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_config_dir = config_home.join("defang-seo");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(app_config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            input: cli.input.clone(),
            content_type: cli
                .content_type
                .clone()
                .or_else(|| self.content_type.clone()),
            metadata: cli.metadata.clone().or_else(|| self.metadata.clone()),
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            validate_urls: if cli.validate_urls {
                cli.validate_urls
            } else {
                self.validate_urls.unwrap_or(cli.validate_urls)
            },
            concurrency: if cli.concurrency != 5 {
                cli.concurrency
            } else {
                self.concurrency.unwrap_or(cli.concurrency)
            },
            rate_limit: cli.rate_limit.or(self.rate_limit),
            timeout: if cli.timeout != 10 {
                cli.timeout
            } else {
                self.timeout.unwrap_or(cli.timeout)
            },
            config: cli.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeoMetadata;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    fn default_cli() -> Cli {
        Cli {
            input: "post.md".to_string(),
            content_type: None,
            metadata: None,
            output: "text".to_string(),
            save: None,
            verbose: false,
            validate_urls: false,
            concurrency: 5,
            rate_limit: None,
            timeout: 10,
            config: None,
        }
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.YML")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_json_config() {
        let json_content = r#"
{
    "content_type": "markdown",
    "output": "json",
    "validate_urls": true,
    "concurrency": 10,
    "timeout": 3
}
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, json_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.content_type, Some("markdown".to_string()));
        assert_eq!(config.output, Some("json".to_string()));
        assert_eq!(config.validate_urls, Some(true));
        assert_eq!(config.concurrency, Some(10));
        assert_eq!(config.timeout, Some(3));

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_toml_config() {
        let toml_content = r#"
output = "json"
verbose = true
rate_limit = 2.5
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("toml");
        fs::write(&temp_path, toml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.output, Some("json".to_string()));
        assert_eq!(config.verbose, Some(true));
        assert_eq!(config.rate_limit, Some(2.5));
        assert_eq!(config.concurrency, None);

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_yaml_config() {
        let yaml_content = r#"
metadata: "meta.yaml"
concurrency: 8
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("yml");
        fs::write(&temp_path, yaml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.metadata, Some("meta.yaml".to_string()));
        assert_eq!(config.concurrency, Some(8));

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, r#"{ invalid json }"#).unwrap();

        assert!(Config::from_file(&temp_path).is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_unsupported_format() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("txt");
        fs::write(&temp_path, "content").unwrap();

        assert!(Config::from_file(&temp_path).is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_structured_metadata() {
        let yaml_content = r#"
title: "Deploying Compose Apps to AWS with One Command Using Defang"
ogTitle: "Deploy to AWS with Defang"
keywords:
  - defang
  - aws
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("yaml");
        fs::write(&temp_path, yaml_content).unwrap();

        let metadata: SeoMetadata = load_structured(&temp_path).unwrap();
        assert_eq!(
            metadata.og_title,
            Some("Deploy to AWS with Defang".to_string())
        );
        assert_eq!(metadata.keywords, vec!["defang", "aws"]);
        assert_eq!(metadata.description, None);

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_merge_with_cli_defaults() {
        let config = Config {
            output: Some("json".to_string()),
            concurrency: Some(10),
            timeout: Some(4),
            validate_urls: Some(true),
            content_type: Some("html".to_string()),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&default_cli());
        assert_eq!(merged.input, "post.md");
        assert_eq!(merged.output, "json"); // from config
        assert_eq!(merged.concurrency, 10); // from config
        assert_eq!(merged.timeout, 4); // from config
        assert!(merged.validate_urls); // from config
        assert_eq!(merged.content_type, Some("html".to_string())); // from config
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let config = Config {
            output: Some("json".to_string()),
            concurrency: Some(10),
            content_type: Some("html".to_string()),
            rate_limit: Some(1.0),
            ..Default::default()
        };

        let cli = Cli {
            content_type: Some("markdown".to_string()),
            output: "xml".to_string(),
            concurrency: 2,
            rate_limit: Some(3.0),
            save: Some("report.json".to_string()),
            ..default_cli()
        };

        let merged = config.merge_with_cli(&cli);
        assert_eq!(merged.output, "xml"); // CLI override
        assert_eq!(merged.concurrency, 2); // CLI override
        assert_eq!(merged.content_type, Some("markdown".to_string())); // CLI override
        assert_eq!(merged.rate_limit, Some(3.0)); // CLI override
        assert_eq!(merged.save, Some("report.json".to_string())); // CLI value
    }

    #[test]
    fn test_default_paths_exists() {
        let paths = Config::default_paths();
        assert!(!paths.is_empty());
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("defang-seo.json"))
        );
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("defang-seo.toml"))
        );
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("defang-seo.yaml"))
        );
    }

    #[test]
    #[serial]
    fn test_default_paths_with_xdg_config_home() {
        use std::env;

        let custom_config = "/custom/config/path";
        unsafe {
            env::set_var("XDG_CONFIG_HOME", custom_config);
        }

        let paths = Config::default_paths();
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("/custom/config/path/defang-seo"))
        );

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_priority_order() {
        use std::env;
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        let app_dir = temp_config_dir.path().join("defang-seo");
        fs::create_dir_all(&app_dir).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        // Config in both locations; the current directory wins
        fs::write(temp_dir.path().join("defang-seo.json"), r#"{"concurrency": 3}"#).unwrap();
        fs::write(app_dir.join("config.json"), r#"{"concurrency": 20}"#).unwrap();

        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.concurrency, Some(3));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_finds_config_dir_config() {
        use std::env;
        use tempfile::tempdir;

        let temp_cwd = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_cwd.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        let app_dir = temp_config_dir.path().join("defang-seo");
        fs::create_dir_all(&app_dir).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        fs::write(app_dir.join("config.toml"), "timeout = 7\n").unwrap();

        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.timeout, Some(7));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_returns_none_when_no_config_exists() {
        use std::env;
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        let result = Config::from_default_paths();
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_returns_error_on_invalid_config() {
        use std::env;
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        fs::write(
            temp_dir.path().join("defang-seo.yaml"),
            "concurrency: [not a number",
        )
        .unwrap();

        assert!(Config::from_default_paths().is_err());

        env::set_current_dir(&original_dir).ok();
    }
}
