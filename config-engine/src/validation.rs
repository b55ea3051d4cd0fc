// Settings validation
use crate::error::{ConfigError, Result};
use crate::settings::Settings;

const IMPORT_MODES: [&str; 3] = ["overwrite", "append", "smart"];

impl Settings {
    /// Reject settings the server and CLI cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.url must not be empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.dashboard.page_size == 0 {
            return Err(ConfigError::ValidationError("dashboard.page_size must be at least 1".into()));
        }
        if self.dashboard.max_claims == 0 {
            return Err(ConfigError::ValidationError("dashboard.max_claims must be at least 1".into()));
        }
        if !IMPORT_MODES.contains(&self.import.default_mode.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "import.default_mode must be one of {}, got '{}'",
                IMPORT_MODES.join(", "),
                self.import.default_mode
            )));
        }
        Ok(())
    }
}
