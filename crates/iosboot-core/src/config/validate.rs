//! Format rules for user-supplied configuration values

use crate::error::ValidationError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("valid regex"));

static DOTTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("valid regex"));

static BUNDLE_ID_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]*(\.[A-Za-z][A-Za-z0-9-]*)+$").expect("valid regex")
});

static LANGUAGE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}$").expect("valid regex"));

/// Application/module name: a letter followed by letters or digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl FromStr for ProjectName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if PROJECT_NAME.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::new(
                "project name",
                s,
                "must start with a letter and contain only letters and digits",
                "MyApp",
            ))
        }
    }
}

/// A `<major>.<minor>` version such as a deployment target or Swift version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedVersion(String);

impl DottedVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse with a field name used in diagnostics
    pub fn parse_field(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        if DOTTED_VERSION.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::new(
                field,
                s,
                "must be in <major>.<minor> form",
                "17.0",
            ))
        }
    }
}

impl FromStr for DottedVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("version", s)
    }
}

/// Reverse-domain prefix for bundle identifiers, e.g. `com.example`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleIdRoot(String);

impl BundleIdRoot {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BundleIdRoot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if BUNDLE_ID_ROOT.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::new(
                "bundle id root",
                s,
                "must be a reverse domain with at least two segments",
                "com.example",
            ))
        }
    }
}

/// ISO 639-1 language code used as the localization source language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if LANGUAGE_CODE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::new(
                "source language",
                s,
                "must be a two-letter lowercase ISO 639-1 code",
                "en",
            ))
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })*
    };
}

display_as_str!(ProjectName, DottedVersion, BundleIdRoot, LanguageCode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_rules() {
        assert!("DemoApp".parse::<ProjectName>().is_ok());
        assert!("A1".parse::<ProjectName>().is_ok());
        assert!("x".parse::<ProjectName>().is_ok());
        assert!("1Demo".parse::<ProjectName>().is_err());
        assert!("Demo App".parse::<ProjectName>().is_err());
        assert!("Demo-App".parse::<ProjectName>().is_err());
        assert!("Demo_App".parse::<ProjectName>().is_err());
        assert!("".parse::<ProjectName>().is_err());
    }

    #[test]
    fn test_dotted_version_rules() {
        assert!("17.0".parse::<DottedVersion>().is_ok());
        assert!("5.10".parse::<DottedVersion>().is_ok());
        assert!("17".parse::<DottedVersion>().is_err());
        assert!("17.0.1".parse::<DottedVersion>().is_err());
        assert!("v17.0".parse::<DottedVersion>().is_err());
        assert!("17.x".parse::<DottedVersion>().is_err());
    }

    #[test]
    fn test_dotted_version_field_name_in_error() {
        let err = DottedVersion::parse_field("deployment target", "seventeen").unwrap_err();
        assert_eq!(err.field, "deployment target");
        assert_eq!(err.example, "17.0");
    }

    #[test]
    fn test_bundle_id_root_rules() {
        assert!("com.example".parse::<BundleIdRoot>().is_ok());
        assert!("io.my-company.apps".parse::<BundleIdRoot>().is_ok());
        assert!("com".parse::<BundleIdRoot>().is_err());
        assert!("com..example".parse::<BundleIdRoot>().is_err());
        assert!("com.1example".parse::<BundleIdRoot>().is_err());
        assert!(".com.example".parse::<BundleIdRoot>().is_err());
        assert!("com.example.".parse::<BundleIdRoot>().is_err());
    }

    #[test]
    fn test_language_code_rules() {
        assert!("en".parse::<LanguageCode>().is_ok());
        assert!("de".parse::<LanguageCode>().is_ok());
        assert!("EN".parse::<LanguageCode>().is_err());
        assert!("eng".parse::<LanguageCode>().is_err());
    }
}
