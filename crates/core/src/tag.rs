//! Tag field rules used by the `validator` derive on tag DTOs.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Maximum length of tag name and slug.
pub const MAX_TAG_FIELD_LEN: u64 = 200;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// Accepts `#RRGGBB`.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color").with_message("must be a #RRGGBB hex color".into()))
    }
}

/// Accepts ASCII letters, digits, `-` and `_`.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("may only contain letters, digits, `-` and `_`".into()))
    }
}
