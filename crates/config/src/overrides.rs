//! Command-line property overrides

use indexmap::IndexMap;
use kiln_core::{Error, Result, PROPERTY_OVERRIDE_PATTERN};
use regex::Regex;

/// Parse `key=value` entries into an ordered override map.
///
/// Keys must be alphanumeric or `_`; the value is everything after the first
/// `=` and may be empty. Later entries for the same key win.
pub fn parse_property_overrides<I, S>(entries: I) -> Result<IndexMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = Regex::new(PROPERTY_OVERRIDE_PATTERN)
        .map_err(|e| Error::configuration(format!("invalid override pattern: {e}")))?;

    let mut overrides = IndexMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry
            .split_once('=')
            .filter(|_| pattern.is_match(entry))
            .ok_or_else(|| Error::invalid_property_override(entry))?;
        overrides.insert(key.to_string(), value.to_string());
    }

    Ok(overrides)
}
