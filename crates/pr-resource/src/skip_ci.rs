//! Skip-CI marker detection

use regex::Regex;
use std::sync::OnceLock;

/// Whether `text` asks CI not to run
///
/// Matches `[ci skip]`, `[skip ci]` and `[no ci]` anywhere in the text,
/// ignoring case.
pub fn contains_skip_ci(text: &str) -> bool {
    static SKIP_CI_REGEX: OnceLock<Regex> = OnceLock::new();

    let regex =
        SKIP_CI_REGEX.get_or_init(|| Regex::new(r"(?i)\[(ci skip|skip ci|no ci)\]").unwrap());

    regex.is_match(text)
}
