//! Declared project dependencies

use serde::{Deserialize, Serialize};
use std::fmt;

/// A runtime or build dependency of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency name
    pub name: String,
    /// Version constraint; absent means any version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Direct source location; takes precedence over `version`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Dependency {
    /// Create a dependency on any version of `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            url: None,
        }
    }

    /// Set the version constraint
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the direct source location
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The requirement an installer should be given for this dependency.
    ///
    /// When a URL is present the version is ignored entirely.
    #[must_use]
    pub fn requirement(&self) -> Requirement<'_> {
        match &self.url {
            Some(url) => Requirement::Url(url),
            None => Requirement::Versioned {
                name: &self.name,
                constraint: self.version.as_deref().filter(|v| !v.is_empty()),
            },
        }
    }
}

/// Install requirement derived from a [`Dependency`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// Install from a direct location
    Url(&'a str),
    /// Install by name, optionally constrained
    Versioned {
        name: &'a str,
        constraint: Option<&'a str>,
    },
}

const CONSTRAINT_OPERATORS: [char; 5] = ['<', '>', '=', '!', '~'];

impl fmt::Display for Requirement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Url(url) => write!(f, "{url}"),
            Requirement::Versioned {
                name,
                constraint: None,
            } => write!(f, "{name}"),
            Requirement::Versioned {
                name,
                constraint: Some(constraint),
            } => {
                if constraint.starts_with(CONSTRAINT_OPERATORS) {
                    write!(f, "{name}{constraint}")
                } else {
                    write!(f, "{name}=={constraint}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_without_version() {
        assert_eq!(Dependency::new("spam").requirement().to_string(), "spam");
    }

    #[test]
    fn test_requirement_pins_bare_version() {
        let dep = Dependency::new("spam").with_version("0.1.2");
        assert_eq!(dep.requirement().to_string(), "spam==0.1.2");
    }

    #[test]
    fn test_requirement_keeps_operator_version() {
        let dep = Dependency::new("spam").with_version(">=0.1.2");
        assert_eq!(dep.requirement().to_string(), "spam>=0.1.2");
    }

    #[test]
    fn test_url_takes_precedence_over_version() {
        let both = Dependency::new("pkg")
            .with_version("1.2.3")
            .with_url("http://example/pkg");
        let url_only = Dependency::new("pkg").with_url("http://example/pkg");

        assert_eq!(both.requirement(), url_only.requirement());
        assert_eq!(both.requirement().to_string(), "http://example/pkg");
    }

    #[test]
    fn test_deserialize_optional_fields() {
        let dep: Dependency = serde_json::from_str(r#"{"name": "spam"}"#).unwrap();
        assert_eq!(dep, Dependency::new("spam"));
    }
}
