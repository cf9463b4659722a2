use crate::{CoreError, CoreResult};
use regex::Regex;
use std::sync::LazyLock;

/// UK postcode shape, checked against the normalized form.
static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,2}[0-9R][0-9A-Z]? [0-9][ABD-HJLNP-UW-Z]{2}$").expect("valid pattern")
});

/// Uppercase and collapse whitespace so the outward and inward codes are
/// separated by exactly one space. The inward code is always three
/// characters, so the separator can be re-inserted when the input has none.
pub fn normalize(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    // Split three characters (not bytes) from the end, so stray multibyte
    // input reaches the pattern check instead of panicking here.
    match compact.char_indices().rev().nth(2) {
        Some((idx, _)) if idx > 0 => {
            let (outward, inward) = compact.split_at(idx);
            format!("{} {}", outward, inward)
        }
        _ => compact,
    }
}

pub fn is_valid(raw: &str) -> bool {
    UK_POSTCODE.is_match(&normalize(raw))
}

/// Normalize and validate in one step.
pub fn parse(raw: &str) -> CoreResult<String> {
    let normalized = normalize(raw);
    if UK_POSTCODE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(CoreError::Validation(format!(
            "not a valid UK postcode: {raw}"
        )))
    }
}
