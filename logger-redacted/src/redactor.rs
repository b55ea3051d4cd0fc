use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"(?:\+1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").unwrap();
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
    static ref MRN_REGEX: Regex = Regex::new(r"\bMRN\d+\b").unwrap();
}

/// PHI redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_mrn: bool,
    /// Replace patient names with a short hash instead of a character mask,
    /// so the same patient can be correlated across log lines
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_mrn: true,
            hash_for_correlation: false,
        }
    }
}

/// Redactor for patient identifiers that end up in log output
#[derive(Debug, Clone, Default)]
pub struct PhiRedactor {
    config: RedactionConfig,
}

impl PhiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Scrub identifier patterns out of free text such as claim notes
    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_ssn {
            result = SSN_REGEX.replace_all(&result, "***-**-****").into_owned();
        }

        if self.config.redact_emails {
            result = EMAIL_REGEX.replace_all(&result, "[EMAIL]").into_owned();
        }

        if self.config.redact_phones {
            result = PHONE_REGEX.replace_all(&result, "(***) ***-****").into_owned();
        }

        if self.config.redact_mrn {
            result = MRN_REGEX.replace_all(&result, "MRN[REDACTED]").into_owned();
        }

        result
    }

    /// Mask a patient name, keeping only its first and last character
    pub fn mask_name(&self, name: &str) -> String {
        let name = name.trim();
        if self.config.hash_for_correlation {
            return format!("PATIENT[{}]", Self::hash_value(name));
        }

        let chars: Vec<char> = name.chars().collect();
        match chars.as_slice() {
            [] => String::new(),
            [first, middle @ .., last] if !middle.is_empty() => {
                let mut masked = String::with_capacity(chars.len());
                masked.push(*first);
                masked.extend(std::iter::repeat('*').take(middle.len()));
                masked.push(*last);
                masked
            }
            _ => "*".repeat(chars.len()),
        }
    }

    fn hash_value(value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let digest = hasher.finalize();
        general_purpose::STANDARD_NO_PAD.encode(&digest[..6])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_name_keeps_edges() {
        let redactor = PhiRedactor::default();
        assert_eq!(redactor.mask_name("John Doe"), "J******e");
        assert_eq!(redactor.mask_name("  Ann  "), "A*n");
    }

    #[test]
    fn test_mask_short_names() {
        let redactor = PhiRedactor::default();
        assert_eq!(redactor.mask_name("Al"), "**");
        assert_eq!(redactor.mask_name("A"), "*");
        assert_eq!(redactor.mask_name(""), "");
    }

    #[test]
    fn test_hashed_names_correlate() {
        let redactor = PhiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });
        let first = redactor.mask_name("Jane Roe");
        assert!(first.starts_with("PATIENT["));
        assert_eq!(first, redactor.mask_name("Jane Roe"));
        assert_ne!(first, redactor.mask_name("John Roe"));
    }

    #[test]
    fn test_ssn_and_email_redaction() {
        let redactor = PhiRedactor::default();
        let text = "Called member 123-45-6789, follow up at jane@example.com";
        let redacted = redactor.redact(text);
        assert!(redacted.contains("***-**-****"));
        assert!(redacted.contains("[EMAIL]"));
        assert!(!redacted.contains("6789"));
    }

    #[test]
    fn test_phone_and_mrn_redaction() {
        let redactor = PhiRedactor::default();
        let redacted = redactor.redact("Phone (555) 123-4567 re MRN123456");
        assert!(redacted.contains("(***) ***-****"));
        assert!(redacted.contains("MRN[REDACTED]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let redactor = PhiRedactor::default();
        let text = "Appeal submitted for CPT 99213";
        assert_eq!(redactor.redact(text), text);
    }
}
