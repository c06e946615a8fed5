//! Per-field validation rules.
//!
//! Each rule either returns the wire-ready value or a [`Violation`] naming the
//! offending field. Rules never log; warnings are returned as data.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::text::{normalize_query, MAX_RAW_QUERY_CHARS, UNSAFE_CHARS};
use crate::errors::Violation;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size and popular-symptom row count accepted by the API.
pub const MAX_ROWS: u32 = 100;

/// Shortest autocomplete prefix, in characters.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

lazy_static! {
    /// Registration number: `DDD DD DDDDD DD`
    static ref REGISTRATION_NUMBER_REGEX: Regex =
        Regex::new(r"^[0-9]{3} [0-9]{2} [0-9]{5} [0-9]{2}$").expect("Invalid regex pattern");

    /// Level-4 ATC code, e.g. N02BE
    static ref ATC_LEVEL4_REGEX: Regex =
        Regex::new(r"^[A-Z][0-9]{2}[A-Z]{2}$").expect("Invalid regex pattern");

    /// Level-5 ATC code, e.g. N02BE01
    static ref ATC_LEVEL5_REGEX: Regex =
        Regex::new(r"^[A-Z][0-9]{2}[A-Z]{2}[0-9]{2}$").expect("Invalid regex pattern");
}

/// Non-fatal note produced while normalizing a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Validate a 1-based page index. Values below 1 are rejected, not coerced.
pub fn page(page: i64) -> Result<u32, Violation> {
    if page < 1 {
        return Err(Violation::input(
            &["page"],
            format!("Page must be at least 1, got {}", page),
            "Pages are numbered from 1.",
        ));
    }
    u32::try_from(page).map_err(|_| {
        Violation::input(
            &["page"],
            format!("Page {} is out of range", page),
            "Request an earlier page.",
        )
    })
}

pub fn page_size(page_size: Option<i64>) -> Result<u32, Violation> {
    match page_size {
        None => Ok(DEFAULT_PAGE_SIZE),
        Some(size) => bounded_rows("page_size", size),
    }
}

/// Row count for popular symptoms, 1..=100.
pub fn rows(rows: i64) -> Result<u32, Violation> {
    bounded_rows("rows", rows)
}

fn bounded_rows(field: &str, value: i64) -> Result<u32, Violation> {
    if (1..=MAX_ROWS as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(Violation::input(
            &[field],
            format!("{} must be between 1 and {}, got {}", field, MAX_ROWS, value),
            format!("Pick a value from 1 to {}.", MAX_ROWS),
        ))
    }
}

/// Check a registration number against the `DDD DD DDDDD DD` pattern.
pub fn registration_number(raw: &str) -> Result<String, Violation> {
    let trimmed = raw.trim();
    if REGISTRATION_NUMBER_REGEX.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Violation::registration_number(
            format!("'{}' is not a valid registration number", trimmed),
            "Use three digits, two digits, five digits and two digits separated by single spaces, e.g. '020 16 20534 00'.",
        ))
    }
}

/// Normalize an ATC code to level 4.
///
/// Level-5 codes are shortened to their level-4 prefix and a warning is
/// returned alongside. Every other shape is rejected.
pub fn atc_code(raw: &str) -> Result<(String, Option<ValidationWarning>), Violation> {
    let code = raw.trim().to_ascii_uppercase();

    if ATC_LEVEL4_REGEX.is_match(&code) {
        return Ok((code, None));
    }

    if ATC_LEVEL5_REGEX.is_match(&code) {
        let level4 = code[..5].to_string();
        let warning = ValidationWarning {
            field: "atc_code".to_string(),
            message: format!(
                "ATC code '{}' shortened to level-4 code '{}'",
                code, level4
            ),
        };
        return Ok((level4, Some(warning)));
    }

    Err(Violation::atc_code(
        format!("'{}' is not a level-4 ATC code", code),
        "Use a level-4 ATC code such as 'N02BE'.",
    ))
}

/// Normalize a free-text query, rejecting oversized, empty or too-short input.
pub fn query(field: &str, raw: &str, min_chars: usize) -> Result<String, Violation> {
    if raw.chars().count() > MAX_RAW_QUERY_CHARS {
        return Err(Violation::input(
            &[field],
            format!("{} exceeds {} characters", field, MAX_RAW_QUERY_CHARS),
            "Shorten the search term.",
        ));
    }

    let normalized = normalize_query(raw);
    if normalized.chars().count() < min_chars.max(1) {
        return Err(Violation::input(
            &[field],
            format!(
                "{} must contain at least {} searchable character(s)",
                field,
                min_chars.max(1)
            ),
            "Enter a longer search term.",
        ));
    }
    Ok(normalized)
}

/// Trim an optional code-like criterion; blank values count as absent.
pub fn optional_criterion(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Check a code-like value (category id, route, package) and return it trimmed.
///
/// Codes are sent verbatim, so oversized values and values carrying unsafe or
/// control characters are rejected rather than cleaned.
pub fn code_value(field: &str, raw: &str) -> Result<String, Violation> {
    let value = raw.trim();

    if value.chars().count() > MAX_RAW_QUERY_CHARS {
        return Err(Violation::input(
            &[field],
            format!("{} exceeds {} characters", field, MAX_RAW_QUERY_CHARS),
            "Use the code from the reference list.",
        ));
    }

    if value
        .chars()
        .any(|c| c.is_control() || UNSAFE_CHARS.contains(&c))
    {
        return Err(Violation::input(
            &[field],
            format!("{} contains characters that are not allowed", field),
            "Use the code from the reference list.",
        ));
    }

    Ok(value.to_string())
}

/// Optional code-like criterion: blank counts as absent, anything else must pass [`code_value`].
pub fn optional_code(field: &str, raw: Option<&str>) -> Result<Option<String>, Violation> {
    optional_criterion(raw)
        .map(|value| code_value(field, &value))
        .transpose()
}

/// Require all of the named values to be non-blank, reporting every missing one at once.
pub fn required_all(values: &[(&'static str, &str)]) -> Result<(), Violation> {
    let missing: Vec<&str> = values
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Violation::input(
            &missing,
            format!("Missing required field(s): {}", missing.join(", ")),
            "Provide every required category.",
        ))
    }
}
