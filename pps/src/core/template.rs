//! Placeholder substitution for project templates.
//!
//! Templates are plain text with `{{ name }}` markers. Rendering is a single
//! substitution pass: there are no conditionals, loops or filters, and values
//! are inserted verbatim (a value that itself looks like a marker is not
//! expanded again).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{StarterError, StarterResult};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex")
});

/// Values keyed by placeholder name.
pub type Placeholders = BTreeMap<String, String>;

/// Names of all placeholders referenced by `body`, sorted and de-duplicated.
pub fn placeholders_in(body: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Substitute every placeholder in `body`.
///
/// Fails with [`StarterError::MissingPlaceholder`] naming every unresolved
/// placeholder when any value is missing. Extra values are ignored.
pub fn render(template_id: &str, body: &str, values: &Placeholders) -> StarterResult<String> {
    let missing: Vec<String> = placeholders_in(body)
        .into_iter()
        .filter(|name| !values.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Err(StarterError::MissingPlaceholder {
            template: template_id.to_string(),
            names: missing,
        });
    }

    let rendered = PLACEHOLDER_RE.replace_all(body, |caps: &Captures<'_>| {
        // Presence checked above.
        values.get(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(rendered.into_owned())
}
