//! Project data model shared by every build phase

use super::dependency::Dependency;
use super::environment::ActiveEnvironments;
use crate::constants::DEFAULT_PROJECT_VERSION;
use crate::errors::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value stored in the project property table
pub type PropertyValue = serde_json::Value;

/// The project being built.
///
/// Owned by a single reactor for one process. Properties follow
/// last-writer-wins semantics and keep no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Project version
    pub version: String,
    /// Absolute base directory
    pub basedir: PathBuf,
    /// Property table
    pub properties: IndexMap<String, PropertyValue>,
    /// Dependencies needed at runtime, in declaration order
    pub runtime_dependencies: Vec<Dependency>,
    /// Dependencies needed only to build, in declaration order
    pub build_dependencies: Vec<Dependency>,
    /// Environments activated for the current build
    #[serde(skip)]
    pub active_environments: ActiveEnvironments,
}

impl Project {
    /// Create a project rooted at `basedir`, named after its final path component
    #[must_use]
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        let basedir = basedir.into();
        let name = basedir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            version: DEFAULT_PROJECT_VERSION.to_string(),
            basedir,
            properties: IndexMap::new(),
            runtime_dependencies: Vec::new(),
            build_dependencies: Vec::new(),
            active_environments: ActiveEnvironments::new(),
        }
    }

    /// Set the project name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the project version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set a property, returning the previous value if any
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Set a property only when it has no value yet
    pub fn set_property_if_unset(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties
            .entry(key.into())
            .or_insert_with(|| value.into());
    }

    /// Get a property by key
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Get a property, falling back to `default` when unset
    #[must_use]
    pub fn get_property_or(&self, key: &str, default: impl Into<PropertyValue>) -> PropertyValue {
        self.properties
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Get a property that must be set
    pub fn get_mandatory_property(&self, key: &str) -> Result<&PropertyValue> {
        self.properties
            .get(key)
            .ok_or_else(|| Error::missing_property(key))
    }

    /// Get a property as a string slice, if it is a string
    #[must_use]
    pub fn property_as_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_str)
    }

    /// Check if a property is set
    #[must_use]
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Check whether a property holds a truthy value.
    ///
    /// Unset, `null`, `false`, `0`, the empty string and empty collections
    /// are falsy.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.properties.get(key) {
            None | Some(PropertyValue::Null) => false,
            Some(PropertyValue::Bool(b)) => *b,
            Some(PropertyValue::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(PropertyValue::String(s)) => !s.is_empty(),
            Some(PropertyValue::Array(items)) => !items.is_empty(),
            Some(PropertyValue::Object(map)) => !map.is_empty(),
        }
    }

    /// Apply string overrides on top of the current properties
    pub fn apply_overrides<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in overrides {
            let key = key.into();
            let value = value.into();
            tracing::debug!(property = %key, value = %value, "Overriding property");
            self.properties.insert(key, PropertyValue::String(value));
        }
    }

    /// Declare a runtime dependency
    pub fn depends_on(&mut self, dependency: Dependency) {
        self.runtime_dependencies.push(dependency);
    }

    /// Declare a build dependency
    pub fn build_depends_on(&mut self, dependency: Dependency) {
        self.build_dependencies.push(dependency);
    }

    /// Check whether an environment is active in the current build
    #[must_use]
    pub fn is_environment_active(&self, environment: &str) -> bool {
        self.active_environments.contains(environment)
    }

    /// Replace `$name` and `${name}` references with property values.
    ///
    /// `$$` yields a literal `$`. Referencing an unset property is an error.
    pub fn expand(&self, template: &str) -> Result<String> {
        let mut output = String::with_capacity(template.len());

        for (index, segment) in template.split("$$").enumerate() {
            if index > 0 {
                output.push('$');
            }
            if segment
                .rfind("${")
                .is_some_and(|open| !segment[open..].contains('}'))
            {
                return Err(Error::configuration(format!(
                    "unterminated property reference in '{template}'"
                )));
            }
            let expanded = shellexpand::env_with_context(segment, |key| {
                self.render_property(key).map(Some)
            })
            .map_err(|e| e.cause)?;
            output.push_str(&expanded);
        }

        Ok(output)
    }

    /// Expand `template` and resolve it against the base directory
    pub fn expand_path(&self, template: &str) -> Result<PathBuf> {
        let expanded = self.expand(template)?;
        Ok(self.resolve_path(Path::new(&expanded)))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }

    fn render_property(&self, key: &str) -> Result<String> {
        let value = self.get_mandatory_property(key)?;
        Ok(match value {
            PropertyValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project() -> Project {
        Project::new("/work/spam")
    }

    #[test]
    fn test_name_defaults_to_directory() {
        let project = project();
        assert_eq!(project.name, "spam");
        assert_eq!(project.version, DEFAULT_PROJECT_VERSION);
    }

    #[test]
    fn test_later_writes_overwrite() {
        let mut project = project();
        project.set_property("x", "0");
        let previous = project.set_property("x", "1");

        assert_eq!(previous, Some(json!("0")));
        assert_eq!(project.property_as_str("x"), Some("1"));
        assert!(project.has_property("x"));
        assert!(!project.has_property("y"));
    }

    #[test]
    fn test_set_property_if_unset_keeps_existing() {
        let mut project = project();
        project.set_property("dir_target", "target");
        project.set_property_if_unset("dir_target", "build");
        project.set_property_if_unset("dir_dist", "dist");

        assert_eq!(project.property_as_str("dir_target"), Some("target"));
        assert_eq!(project.property_as_str("dir_dist"), Some("dist"));
    }

    #[test]
    fn test_mandatory_property() {
        let project = project();
        let err = project.get_mandatory_property("missing").unwrap_err();
        assert!(matches!(err, Error::MissingProperty { ref key } if key == "missing"));
    }

    #[test]
    fn test_get_property_or() {
        let mut project = project();
        assert_eq!(project.get_property_or("retries", 3), json!(3));
        project.set_property("retries", 5);
        assert_eq!(project.get_property_or("retries", 3), json!(5));
    }

    #[test]
    fn test_truthiness() {
        let mut project = project();
        project.set_property("yes", true);
        project.set_property("no", false);
        project.set_property("empty", "");
        project.set_property("zero", 0);
        project.set_property("word", "on");

        assert!(project.is_truthy("yes"));
        assert!(project.is_truthy("word"));
        assert!(!project.is_truthy("no"));
        assert!(!project.is_truthy("empty"));
        assert!(!project.is_truthy("zero"));
        assert!(!project.is_truthy("unset"));
    }

    #[test]
    fn test_overrides_are_strings() {
        let mut project = project();
        project.set_property("x", 0);
        project.apply_overrides([("x", "1")]);
        assert_eq!(project.get_property("x"), Some(&json!("1")));
    }

    #[test]
    fn test_expand() {
        let mut project = project();
        project.set_property("dir_target", "target");
        project.set_property("jobs", 4);

        assert_eq!(
            project.expand("$dir_target/dist-${jobs}").unwrap(),
            "target/dist-4"
        );
        assert_eq!(project.expand("cost: $$5 $").unwrap(), "cost: $5 $");
        assert_eq!(project.expand("$$$dir_target").unwrap(), "$target");
        assert_eq!(project.expand("plain text").unwrap(), "plain text");
        assert!(project.expand("$nope").is_err());
        assert!(project.expand("${dir_target").is_err());
    }

    #[test]
    fn test_expand_path_is_relative_to_basedir() {
        let mut project = project();
        project.set_property("dir_target", "target");

        assert_eq!(
            project.expand_path("$dir_target/reports").unwrap(),
            PathBuf::from("/work/spam/target/reports")
        );
        assert_eq!(
            project.expand_path("/tmp/out").unwrap(),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn test_dependencies_keep_duplicates_in_order() {
        let mut project = project();
        project.depends_on(Dependency::new("spam"));
        project.depends_on(Dependency::new("spam").with_version("1.0"));
        project.build_depends_on(Dependency::new("eggs"));

        assert_eq!(project.runtime_dependencies.len(), 2);
        assert_eq!(project.runtime_dependencies[1].version.as_deref(), Some("1.0"));
        assert_eq!(project.build_dependencies[0].name, "eggs");
    }
}
