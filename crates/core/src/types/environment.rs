//! Environment activation and gating

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of environment names activated for one build invocation
pub type ActiveEnvironments = BTreeSet<String>;

/// Environment condition attached to hooks and initializers.
///
/// An empty gate is unconditional: it admits every build, including builds
/// with no active environment. A non-empty gate admits a build only when at
/// least one of its names is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentGate(BTreeSet<String>);

impl EnvironmentGate {
    /// Gate that is always open
    #[must_use]
    pub fn always() -> Self {
        Self(BTreeSet::new())
    }

    /// Gate restricted to the given environments
    #[must_use]
    pub fn only<I, S>(environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(environments.into_iter().map(Into::into).collect())
    }

    /// Check whether the gate has no environment restriction
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether the gate admits a build with the given active environments
    #[must_use]
    pub fn admits(&self, active: &ActiveEnvironments) -> bool {
        self.is_unconditional() || self.0.iter().any(|env| active.contains(env))
    }

    /// Iterate over the gated environment names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for EnvironmentGate {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::only(iter)
    }
}

impl fmt::Display for EnvironmentGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconditional() {
            write!(f, "<all environments>")
        } else {
            let names: Vec<&str> = self.iter().collect();
            write!(f, "{}", names.join(", "))
        }
    }
}
