// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template variable interpolation

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Regex pattern for ${variable_name}
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `${name}` placeholders with values from the vars map
///
/// Unknown placeholders are left as-is so that shell variables inside
/// workflow rules survive rendering. No environment expansion happens here;
/// the output depends only on the template and `vars`.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(val) => val.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Placeholder names in `template` that `vars` does not supply, sorted.
pub fn unresolved_placeholders(template: &str, vars: &HashMap<String, String>) -> Vec<String> {
    VAR_PATTERN
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| !vars.contains_key(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
