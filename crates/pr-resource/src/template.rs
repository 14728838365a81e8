//! Build metadata substitution for comments and status fields

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Variables Concourse exposes to a resource about the running build
pub const BUILD_METADATA: [&str; 6] = [
    "BUILD_ID",
    "BUILD_NAME",
    "BUILD_JOB_NAME",
    "BUILD_PIPELINE_NAME",
    "BUILD_TEAM_NAME",
    "ATC_EXTERNAL_URL",
];

/// Replace `$NAME` and `${NAME}` with build metadata from `env`
///
/// Only [`BUILD_METADATA`] names are substituted; a missing value expands to
/// an empty string. Any other reference is written back as `$NAME`.
pub fn expand_build_metadata(text: &str, env: &HashMap<String, String>) -> String {
    static VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

    let regex = VARIABLE_REGEX.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap()
    });

    regex
        .replace_all(text, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());

            if BUILD_METADATA.contains(&name) {
                env.get(name).cloned().unwrap_or_default()
            } else {
                format!("${}", name)
            }
        })
        .into_owned()
}
