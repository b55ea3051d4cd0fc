use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::settings::Settings;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "claims.yaml";

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "CLAIMS_";

/// Layered settings loader
#[derive(Debug, Clone)]
pub struct ConfigEngine {
    figment: Figment,
}

impl ConfigEngine {
    /// Start from compiled defaults
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(Settings::default())),
        }
    }

    /// Merge a YAML file; a missing file contributes nothing
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        debug!(path = %path.as_ref().display(), "Adding configuration file");
        self.figment = self.figment.merge(Yaml::file(path.as_ref()));
        self
    }

    /// Merge `CLAIMS_*` variables and `DATABASE_URL`
    pub fn with_env(mut self) -> Self {
        self.figment = self
            .figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()));
        self
    }

    /// Extract and validate the settings
    ///
    /// # Errors
    ///
    /// Returns an error when a source fails to parse or the merged settings
    /// do not validate.
    pub fn load(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Load settings from `path` (or [`DEFAULT_CONFIG_FILE`]) and the environment
///
/// # Errors
///
/// See [`ConfigEngine::load`].
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    ConfigEngine::new().with_file(path).with_env().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        let settings = ConfigEngine::new().load().unwrap();
        assert_eq!(settings.dashboard.page_size, 30);
        assert_eq!(settings.dashboard.max_claims, 100);
        assert_eq!(settings.import.default_mode, "smart");
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "claims.yaml",
                r"
server:
  port: 9100
dashboard:
  page_size: 10
",
            )?;
            let settings = load_settings(None).map_err(|e| e.to_string())?;
            assert_eq!(settings.server.port, 9100);
            assert_eq!(settings.dashboard.page_size, 10);
            assert_eq!(settings.dashboard.max_claims, 100);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("claims.yaml", "server:\n  port: 9100\n")?;
            jail.set_env("CLAIMS_SERVER__PORT", "9200");
            jail.set_env("DATABASE_URL", "postgresql://u:p@db:5432/claims_test");
            let settings = load_settings(None).map_err(|e| e.to_string())?;
            assert_eq!(settings.server.port, 9200);
            assert_eq!(settings.database.url, "postgresql://u:p@db:5432/claims_test");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_settings_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("CLAIMS_IMPORT__DEFAULT_MODE", "merge");
            assert!(load_settings(None).is_err());
            Ok(())
        });
    }
}
