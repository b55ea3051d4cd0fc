use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ClaimsError;

pub use database_layer::models::{
    underpayment, Claim, ClaimDetail, ClaimFilter, ClaimListItem, Flag, NewClaim, NewClaimDetail,
    Note, StatusCount, StatusCounts, TableCounts,
};

/// How incoming claims are reconciled with rows already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Delete and re-insert existing claims, dropping their annotations
    Overwrite,
    /// Only insert claims that are not stored yet
    Append,
    /// Update existing claims in place and insert new ones
    #[default]
    Smart,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Overwrite => "overwrite",
            ImportMode::Append => "append",
            ImportMode::Smart => "smart",
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ImportMode::Overwrite),
            "append" => Ok(ImportMode::Append),
            "smart" => Ok(ImportMode::Smart),
            other => Err(ClaimsError::Validation(format!(
                "Unknown import mode '{other}', expected overwrite, append or smart"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_mode_parsing() {
        assert_eq!("smart".parse::<ImportMode>().unwrap(), ImportMode::Smart);
        assert_eq!(" Overwrite ".parse::<ImportMode>().unwrap(), ImportMode::Overwrite);
        assert_eq!("APPEND".parse::<ImportMode>().unwrap(), ImportMode::Append);
        assert!("merge".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_import_mode_defaults_to_smart() {
        assert_eq!(ImportMode::default(), ImportMode::Smart);
        assert_eq!(ImportMode::default().to_string(), "smart");
    }

    #[test]
    fn test_import_mode_serde() {
        let json = serde_json::to_string(&ImportMode::Append).unwrap();
        assert_eq!(json, "\"append\"");
        let mode: ImportMode = serde_json::from_str("\"overwrite\"").unwrap();
        assert_eq!(mode, ImportMode::Overwrite);
    }
}
