use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collation::OrderingKind;
use crate::tree::DuplicatePolicy;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server address (e.g., "0.0.0.0:8080")
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Configuration directory
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    /// JSON file with accounts, used instead of the database when set
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Tree construction and display
    #[serde(default)]
    pub tree: TreeConfig,
    /// Database configuration (loaded from separate file)
    #[serde(skip)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Sibling ordering: "locale" or "segments"
    #[serde(default)]
    pub ordering: OrderingKind,
    /// Duplicate id handling: "keep_last", "keep_first" or "reject"
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    /// Row indentation per level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Deepest nesting level accepted when building trees
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingKind::default(),
            duplicates: DuplicatePolicy::default(),
            indent_width: default_indent_width(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_indent_width() -> usize {
    20
}

fn default_max_depth() -> Option<usize> {
    Some(256)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database host
    #[serde(default = "default_db_host")]
    pub host: String,
    /// Database port
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Database name
    #[serde(default = "default_db_name", rename = "database")]
    pub name: String,
    /// Database user
    #[serde(default = "default_db_user", rename = "username")]
    pub user: String,
    /// Database password
    #[serde(default)]
    pub password: String,
}

// Default value functions
fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("./etc")
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "contabil".to_string()
}

fn default_db_user() -> String {
    "postgres".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            config_dir: default_config_dir(),
            seed_file: None,
            log: LogConfig::default(),
            tree: TreeConfig::default(),
            database: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            name: default_db_name(),
            user: default_db_user(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Generate database connection URL
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Database config lives in a separate db.toml next to the main file
        let db_toml_path = config.config_dir.join("db.toml");
        if db_toml_path.exists() {
            let db_content = std::fs::read_to_string(&db_toml_path)?;
            config.database = Some(toml::from_str(&db_content)?);
        }

        Ok(config)
    }
}
