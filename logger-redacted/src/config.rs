// Logger configuration
use serde::{Deserialize, Serialize};

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, coloured output for development
    Pretty,
    /// Structured JSON lines for production
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub log_level: String,
    pub format: LogFormat,
    /// Crate targets that receive `log_level`; everything else stays at `warn`
    pub targets: Vec<String>,
}

impl LoggerConfig {
    /// Pick the output format from `RECOVERY_ENV` (`production` selects JSON)
    pub fn from_env(verbose: bool) -> Self {
        let production = std::env::var("RECOVERY_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Self {
            log_level: if verbose { "debug" } else { "info" }.to_string(),
            format: if production { LogFormat::Json } else { LogFormat::Pretty },
            ..Self::default()
        }
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Build the `EnvFilter` directive string
    pub fn filter_directive(&self) -> String {
        let mut directive = String::from("warn");
        for target in &self.targets {
            directive.push(',');
            directive.push_str(target);
            directive.push('=');
            directive.push_str(&self.log_level);
        }
        directive.push_str(",tower_http=info,sqlx=warn");
        directive
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            targets: vec![
                "claims_service".to_string(),
                "database_layer".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let config = LoggerConfig::default().with_targets(["ops_cli", "claims_service"]);
        assert_eq!(
            config.filter_directive(),
            "warn,ops_cli=info,claims_service=info,tower_http=info,sqlx=warn"
        );
    }
}
