use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default timeout for connecting to and reading from the identity provider
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: basic_toml::Error,
    },
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthFlowSettings {
    pub provider: ProviderSettings,
    pub flow: FlowSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,

    // Direct values (can be overridden by environment variables)
    pub client_id: Option<String>,
    /// Client secret sent as basic auth on the token call
    pub credentials: Option<String>,

    // Environment variable names for overrides
    pub client_id_env: Option<String>,
    pub credentials_env: Option<String>,

    /// Tenant discriminator included in every login request
    pub brand: String,

    pub authorization_code_path: String,
    pub access_token_path: String,
    pub login_path: String,

    pub connect_timeout_ms: u64,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlowSettings {
    /// Post `Outcome::Rejected` for statuses other than 401/403 instead of
    /// ending the attempt without an outcome
    pub report_unmapped_status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            client_id: None,
            credentials: None,
            client_id_env: None,
            credentials_env: None,
            brand: String::new(),
            authorization_code_path: "oauth/grant-code".to_string(),
            access_token_path: "oauth/access-token".to_string(),
            login_path: "login".to_string(),
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AuthFlowSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file(Path::new(".env"));

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `AUTHFLOW_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        let default_config_path = Path::new("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(default_config_path)?;
            log::debug!("Loaded base settings from {}", default_config_path.display());
        }

        if let Ok(secrets_dir) = std::env::var("AUTHFLOW_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                log::debug!("Overriding settings from {}", secrets_path.display());
            } else {
                log::debug!(
                    "AUTHFLOW_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid settings TOML.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        basic_toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_provider_env_overrides(&mut settings.provider);
        Self::apply_flow_env_overrides(&mut settings.flow);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_provider_env_overrides(provider: &mut ProviderSettings) {
        if let Ok(base_url) = std::env::var("AUTHFLOW_BASE_URL") {
            provider.base_url = base_url;
        }
        if let Ok(client_id) = std::env::var("AUTHFLOW_CLIENT_ID") {
            provider.client_id = Some(client_id);
        }
        if let Ok(credentials) = std::env::var("AUTHFLOW_CREDENTIALS") {
            provider.credentials = Some(credentials);
        }
        if let Ok(brand) = std::env::var("AUTHFLOW_BRAND") {
            provider.brand = brand;
        }
        if let Ok(timeout_str) = std::env::var("AUTHFLOW_TIMEOUT_MS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                provider.connect_timeout_ms = timeout;
                provider.timeout_ms = timeout;
            }
        }
    }

    fn apply_flow_env_overrides(flow: &mut FlowSettings) {
        if let Ok(report_str) = std::env::var("AUTHFLOW_REPORT_UNMAPPED_STATUS") {
            if let Ok(report) = report_str.parse::<bool>() {
                flow.report_unmapped_status = report;
            }
        }
    }

    fn apply_logging_env_overrides(logging: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging.level = log_level;
        }
    }

    /// Load environment variables from a `.env` file, if present
    fn load_env_file(path: &Path) {
        if let Ok(contents) = fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Check that everything the flow needs is present
    ///
    /// # Errors
    ///
    /// Returns an error if the client id, credentials or brand are missing, or the
    /// base URL does not parse.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if is_blank(self.provider.get_client_id().as_deref()) {
            return Err(SettingsError::Missing("provider.client_id"));
        }
        if is_blank(self.provider.get_credentials().as_deref()) {
            return Err(SettingsError::Missing("provider.credentials"));
        }
        if self.provider.brand.is_empty() {
            return Err(SettingsError::Missing("provider.brand"));
        }
        url::Url::parse(&self.provider.base_url).map_err(|e| {
            SettingsError::Invalid(format!("provider.base_url '{}': {e}", self.provider.base_url))
        })?;
        Ok(())
    }

    /// Initialize the global logger at the configured level.
    ///
    /// `RUST_LOG`, when set, has already replaced the configured level during
    /// [`AuthFlowSettings::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger was already installed.
    pub fn init_logging(&self) -> Result<(), log::SetLoggerError> {
        env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()
    }
}

impl ProviderSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_id.clone()
    }

    /// Get the credentials, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_credentials(&self) -> Option<String> {
        if let Some(env_var) = &self.credentials_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.credentials.clone()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
