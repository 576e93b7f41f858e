use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "sqlite" or "postgres"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_random_code_length")]
    pub random_code_length: usize,
    /// Where a request for the bare root path is sent.
    #[serde(default = "default_default_url")]
    pub default_url: String,
    /// Seconds between click-buffer flushes to storage.
    #[serde(default = "default_click_flush_interval")]
    pub click_flush_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "plain" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log to this file instead of stdout when set.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_storage_backend() -> String {
    "sqlite".to_string()
}

fn default_database_url() -> String {
    "links.db".to_string()
}

fn default_random_code_length() -> usize {
    6
}

fn default_default_url() -> String {
    "https://github.com".to_string()
}

fn default_click_flush_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            database_url: default_database_url(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            random_code_length: default_random_code_length(),
            default_url: default_default_url(),
            click_flush_interval: default_click_flush_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with environment variable overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from_file();
        config.override_with_env();
        config
    }

    fn load_from_file() -> Self {
        let config_paths = ["config.toml", "linkmint.toml", "/etc/linkmint/config.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                match fs::read_to_string(path) {
                    Ok(content) => match toml::from_str::<Config>(&content) {
                        Ok(config) => {
                            debug!("Loaded config from: {}", path);
                            return config;
                        }
                        Err(e) => {
                            warn!("Failed to parse config file {}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        warn!("Failed to read config file {}: {}", path, e);
                    }
                }
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    fn override_with_env(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(cpu_count) = env::var("CPU_COUNT") {
            if let Ok(count) = cpu_count.parse() {
                self.server.cpu_count = count;
            }
        }
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            self.storage.database_url = url;
        }
        if let Ok(length) = env::var("RANDOM_CODE_LENGTH") {
            if let Ok(length) = length.parse() {
                self.features.random_code_length = length;
            }
        }
        if let Ok(url) = env::var("DEFAULT_URL") {
            self.features.default_url = url;
        }
        if let Ok(interval) = env::var("CLICK_FLUSH_INTERVAL") {
            if let Ok(interval) = interval.parse() {
                self.features.click_flush_interval = interval;
            }
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Install the process-wide configuration. Called once from startup,
/// before anything reads it.
pub fn init_config(config: Config) {
    if CONFIG.set(config).is_err() {
        warn!("init_config called more than once, keeping existing config");
    }
}

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}
