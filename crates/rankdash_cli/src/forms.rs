//! Create-project form behavior.
//!
//! Mirrors the dashboard modal: both fields are required after trimming,
//! and a bare domain gets an `https://` prefix before submission.

use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingName,
    MissingDomain,
    InvalidSettings(String),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "project name is required"),
            Self::MissingDomain => write!(f, "website URL is required"),
            Self::InvalidSettings(message) => {
                write!(f, "settings must be a JSON object: {message}")
            }
        }
    }
}

impl Error for FormError {}

/// Trims `raw` and prefixes `https://` unless it already names an HTTP(S)
/// scheme.
pub fn normalize_domain_input(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Builds the `project.create` input from raw form fields.
pub fn project_create_input(
    name: &str,
    domain: &str,
    settings: Option<&str>,
) -> Result<Value, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::MissingName);
    }
    if domain.trim().is_empty() {
        return Err(FormError::MissingDomain);
    }

    let mut input = json!({
        "name": name,
        "domain": normalize_domain_input(domain),
    });
    if let Some(raw) = settings {
        let parsed: Map<String, Value> = serde_json::from_str(raw)
            .map_err(|err| FormError::InvalidSettings(err.to_string()))?;
        input["settings"] = Value::Object(parsed);
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::{normalize_domain_input, project_create_input, FormError};
    use serde_json::json;

    #[test]
    fn bare_domain_gets_https_prefix() {
        assert_eq!(normalize_domain_input(" shop.test "), "https://shop.test");
        assert_eq!(normalize_domain_input("http://shop.test"), "http://shop.test");
        assert_eq!(
            normalize_domain_input("https://shop.test/path"),
            "https://shop.test/path"
        );
    }

    #[test]
    fn other_schemes_are_still_prefixed() {
        assert_eq!(
            normalize_domain_input("ftp://shop.test"),
            "https://ftp://shop.test"
        );
    }

    #[test]
    fn blank_fields_block_submission() {
        assert_eq!(
            project_create_input("  ", "shop.test", None),
            Err(FormError::MissingName)
        );
        assert_eq!(
            project_create_input("Shop", " ", None),
            Err(FormError::MissingDomain)
        );
    }

    #[test]
    fn input_is_trimmed_and_carries_settings() {
        let input = project_create_input(" Shop ", "shop.test", Some(r#"{"region":"eu"}"#)).unwrap();
        assert_eq!(
            input,
            json!({"name": "Shop", "domain": "https://shop.test", "settings": {"region": "eu"}})
        );
    }

    #[test]
    fn non_object_settings_are_rejected() {
        assert!(matches!(
            project_create_input("Shop", "shop.test", Some("[1]")),
            Err(FormError::InvalidSettings(_))
        ));
    }
}
