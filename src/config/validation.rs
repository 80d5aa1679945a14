//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject values still carrying an unsubstituted `####NAME####` placeholder
//! - Validate value ranges (timeouts > 0, hash length, URL scheme)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::Settings;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} still contains the template placeholder {placeholder}")]
    Placeholder {
        field: &'static str,
        placeholder: String,
    },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Validate a fully merged configuration.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let jcli_path = settings.jcli.path.to_string_lossy();
    let text_fields: [(&'static str, &str); 4] = [
        ("jcli.path", &*jcli_path),
        ("node.rest_url", &settings.node.rest_url),
        ("genesis.block0_hash", &settings.genesis.block0_hash),
        ("faucet.secret_key", &settings.faucet.secret_key),
    ];
    for (field, value) in text_fields {
        if let Some(placeholder) = find_placeholder(value) {
            errors.push(ValidationError::Placeholder {
                field,
                placeholder: placeholder.to_string(),
            });
        }
    }

    if settings.faucet.secret_key.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "faucet.secret_key",
        });
    }

    let hash = settings.genesis.block0_hash.trim();
    if hash.is_empty() {
        errors.push(ValidationError::Missing {
            field: "genesis.block0_hash",
        });
    } else if find_placeholder(hash).is_none()
        && (hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()))
    {
        errors.push(ValidationError::Invalid {
            field: "genesis.block0_hash",
            reason: "expected 64 hex characters".to_string(),
        });
    }

    if find_placeholder(&settings.node.rest_url).is_none() {
        match url::Url::parse(&settings.node.rest_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::Invalid {
                field: "node.rest_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::Invalid {
                field: "node.rest_url",
                reason: e.to_string(),
            }),
        }
    }

    if jcli_path.trim().is_empty() {
        errors.push(ValidationError::Missing { field: "jcli.path" });
    }

    if settings.node.request_timeout_secs == 0 {
        errors.push(ValidationError::Invalid {
            field: "node.request_timeout_secs",
            reason: "must be greater than zero".to_string(),
        });
    }

    if settings.confirmation.enabled {
        if settings.confirmation.timeout_secs == 0 {
            errors.push(ValidationError::Invalid {
                field: "confirmation.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if settings.confirmation.poll_interval_ms == 0 {
            errors.push(ValidationError::Invalid {
                field: "confirmation.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Find a `####NAME####` token left over from script-style templating.
fn find_placeholder(value: &str) -> Option<&str> {
    let start = value.find("####")?;
    let rest = &value[start + 4..];
    let end = rest.find("####")?;
    let name = &rest[..end];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(&value[start..start + 4 + end + 4])
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "adbdd5ede31637f6c9bad5c271eec0bc3d0cb9efb86a5b913bb55cba549d0770";

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.genesis.block0_hash = HASH.to_string();
        settings.faucet.secret_key = "ed25519e_sk1faucet".to_string();
        settings
    }

    #[test]
    fn test_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = validate_settings(&Settings::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::Missing {
            field: "faucet.secret_key"
        }));
        assert!(errors.contains(&ValidationError::Missing {
            field: "genesis.block0_hash"
        }));
    }

    #[test]
    fn test_unsubstituted_placeholder() {
        let mut settings = valid_settings();
        settings.node.rest_url = "####REST_URL####".to_string();
        settings.genesis.block0_hash = "####BLOCK0_HASH####".to_string();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::Placeholder {
            field: "node.rest_url",
            placeholder: "####REST_URL####".to_string(),
        }));
    }

    #[test]
    fn test_bad_hash_and_url() {
        let mut settings = valid_settings();
        settings.genesis.block0_hash = "abc".to_string();
        settings.node.rest_url = "ftp://node".to_string();

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].to_string().contains("ftp"));
    }

    #[test]
    fn test_confirmation_ranges_only_checked_when_enabled() {
        let mut settings = valid_settings();
        settings.confirmation.poll_interval_ms = 0;
        assert!(validate_settings(&settings).is_ok());

        settings.confirmation.enabled = true;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_find_placeholder() {
        assert_eq!(find_placeholder("a ####CLI#### b"), Some("####CLI####"));
        assert_eq!(find_placeholder("########"), None);
        assert_eq!(find_placeholder("plain"), None);
    }
}
