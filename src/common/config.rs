//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Target API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Login credentials used by every scenario
    #[serde(default)]
    pub credentials: Credentials,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Pre-existing data and title prefixes
    #[serde(default)]
    pub fixtures: Fixtures,

    /// Field values for the book created by the book lifecycle
    #[serde(default)]
    pub book: BookTemplate,
}

/// Target API settings
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the bookstore service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the login endpoint, relative to the base URL
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_login_path() -> String {
    "/users/login".to_string()
}

/// Credentials exchanged for a bearer token
#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
        }
    }
}

fn default_email() -> String {
    "john.doe@example.com".to_string()
}

fn default_password() -> String {
    "password123".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Timeout for a single HTTP request
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
        }
    }
}

fn default_request() -> u64 {
    30
}

/// Data the target environment must already contain, and generated-title prefixes
#[derive(Debug, Deserialize, Clone)]
pub struct Fixtures {
    /// Title of a book seeded in the environment before the suite runs
    #[serde(default = "default_seeded_title")]
    pub seeded_book_title: String,

    /// Expected author of the seeded book
    #[serde(default = "default_seeded_author")]
    pub seeded_book_author: String,

    #[serde(default = "default_category_prefix")]
    pub category_prefix: String,

    #[serde(default = "default_book_prefix")]
    pub book_prefix: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            seeded_book_title: default_seeded_title(),
            seeded_book_author: default_seeded_author(),
            category_prefix: default_category_prefix(),
            book_prefix: default_book_prefix(),
        }
    }
}

fn default_seeded_title() -> String {
    "The Great Gatsby".to_string()
}
fn default_seeded_author() -> String {
    "F. Scott Fitzgerald".to_string()
}
fn default_category_prefix() -> String {
    "categoryName".to_string()
}
fn default_book_prefix() -> String {
    "bookTitle".to_string()
}

/// Field values for the generated book (its title comes from the generator)
#[derive(Debug, Deserialize, Clone)]
pub struct BookTemplate {
    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_price")]
    pub price: f64,

    #[serde(default = "default_pages")]
    pub pages: u32,
}

impl Default for BookTemplate {
    fn default() -> Self {
        Self {
            author: default_author(),
            description: default_description(),
            price: default_price(),
            pages: default_pages(),
        }
    }
}

fn default_author() -> String {
    "Test author".to_string()
}
fn default_description() -> String {
    "Test description".to_string()
}
fn default_price() -> f64 {
    20.99
}
fn default_pages() -> u32 {
    50
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let base = &self.api.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(super::Error::Config(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
        if self.timeouts.request_secs == 0 {
            return Err(super::Error::Config(
                "timeouts.request_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded file
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if let Some(email) = email {
            self.credentials.email = email;
        }
        if let Some(password) = password {
            self.credentials.password = password;
        }
        self.validate()?;
        Ok(self)
    }
}
