//! Shared constants

/// File name of the build descriptor looked up in the project directory
pub const DESCRIPTOR_FILENAME: &str = "build.json";

/// Environment variable holding comma-separated default environments
pub const KILN_ENV_VAR: &str = "KILN_ENV";

/// Environment variable overriding the log filter
pub const KILN_LOG_VAR: &str = "KILN_LOG";

/// Property set to `true` when verbose output was requested
pub const VERBOSE_PROPERTY: &str = "verbose";

/// Version assigned to projects whose descriptor does not declare one
pub const DEFAULT_PROJECT_VERSION: &str = "1.0-SNAPSHOT";

/// Syntax of a `-P` property override
pub const PROPERTY_OVERRIDE_PATTERN: &str = r"^[A-Za-z0-9_]+=.*";
