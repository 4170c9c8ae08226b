//! Document naming.
//!
//! New documents are named from a per-type, per-year series
//! (`ACC-JV-2026-00042`). Amendments of a cancelled document take the
//! cancelled name plus a counter (`ACC-JV-2026-00042-1`, then `-2`).

use super::types::DocType;

/// Width of the zero-padded counter in generated names.
const SERIES_DIGITS: usize = 5;

/// Returns the series key a counter is kept under, e.g. `ACC-SINV-2026-`.
#[must_use]
pub fn series_key(doctype: DocType, year: i32) -> String {
    format!("{}-{year}-", doctype.naming_prefix())
}

/// Formats a new document name from its series and counter value.
#[must_use]
pub fn format_name(doctype: DocType, year: i32, sequence: i64) -> String {
    format!(
        "{}{sequence:0width$}",
        series_key(doctype, year),
        width = SERIES_DIGITS
    )
}

/// Returns the name of the amendment replacing `name`.
///
/// `is_amendment` tells whether `name` itself already amends an earlier
/// document, in which case its trailing counter is bumped instead of a new
/// one being appended.
#[must_use]
pub fn amended_name(name: &str, is_amendment: bool) -> String {
    if is_amendment {
        if let Some((base, counter)) = name.rsplit_once('-') {
            if let Ok(n) = counter.parse::<u32>() {
                return format!("{base}-{}", n + 1);
            }
        }
    }
    format!("{name}-1")
}
