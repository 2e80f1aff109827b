//! User settings for rentshare
//!
//! Settings are loaded once at start-up and passed into the services that
//! need them. Admin credentials may come from the settings file or from the
//! environment; the environment wins.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::ExpenseTreatment;

/// Environment override for the admin username
pub const ADMIN_USER_ENV: &str = "RENTSHARE_ADMIN_USER";
/// Environment override for the token signing secret
pub const SECRET_KEY_ENV: &str = "RENTSHARE_SECRET_KEY";

/// Credentials for the single administrative user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_admin_user")]
    pub username: String,

    /// Secret used to sign access tokens. Never written back to disk when it
    /// came from the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Lifetime of an issued access token
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u32,
}

fn default_admin_user() -> String {
    "admin".to_string()
}

fn default_token_ttl() -> u32 {
    120
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username: default_admin_user(),
            secret_key: None,
            token_ttl_minutes: default_token_ttl(),
        }
    }
}

impl AdminSettings {
    /// Whether a signing secret has been provided
    pub fn has_secret(&self) -> bool {
        self.secret_key
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// The secret with all but its last four characters masked
    pub fn masked_secret(&self) -> String {
        match self.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => {
                let chars: Vec<char> = secret.chars().collect();
                let visible = chars.len().saturating_sub(4);
                let tail: String = chars[visible..].iter().collect();
                format!("{}{}", "*".repeat(visible.min(8)), tail)
            }
            _ => "(not set)".to_string(),
        }
    }
}

/// User settings for rentshare
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Name of the building shown in report headers
    #[serde(default = "default_building_name")]
    pub building_name: String,

    /// How owner-specific expenses reduce the distributable pool
    #[serde(default)]
    pub expense_treatment: ExpenseTreatment,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for wallet entry timestamps (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub admin: AdminSettings,

    /// Whether `rentshare init` has been run
    #[serde(default)]
    pub setup_completed: bool,

    /// Secret as read from the settings file
    #[serde(skip)]
    file_secret: Option<String>,

    /// Whether `admin.secret_key` was taken from the environment
    #[serde(skip)]
    secret_from_env: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_building_name() -> String {
    "Building 296".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            building_name: default_building_name(),
            expense_treatment: ExpenseTreatment::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            admin: AdminSettings::default(),
            setup_completed: false,
            file_secret: None,
            secret_from_env: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Environment overrides are applied after loading.
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let mut settings = Self::load_file(paths)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load settings from disk without environment overrides
    fn load_file(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str::<Settings>(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            Settings::default()
        };

        settings.file_secret = settings.admin.secret_key.clone();
        Ok(settings)
    }

    /// Overlay admin credentials from the environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ADMIN_USER_ENV).ok(),
            std::env::var(SECRET_KEY_ENV).ok(),
        );
    }

    /// Overlay admin credentials; blank values are ignored
    fn apply_overrides(&mut self, user: Option<String>, secret: Option<String>) {
        if let Some(user) = user {
            if !user.trim().is_empty() {
                self.admin.username = user.trim().to_string();
            }
        }
        if let Some(secret) = secret {
            if !secret.is_empty() {
                self.admin.secret_key = Some(secret);
                self.secret_from_env = true;
            }
        }
    }

    /// Save settings to disk
    ///
    /// A secret key supplied through the environment is not persisted; the
    /// one read from the file is written back in its place.
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let mut on_disk = self.clone();
        if self.secret_from_env {
            on_disk.admin.secret_key = self.file_secret.clone();
        }

        let contents = serde_json::to_string_pretty(&on_disk)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
