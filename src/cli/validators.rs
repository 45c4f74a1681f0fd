//! CLI argument validators.

use crate::constants::confidence::{MAX, MIN};

/// Parse and validate confidence value (0.0-1.0).
pub fn parse_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(MIN..=MAX).contains(&value) {
        return Err(format!(
            "confidence must be between {MIN:.1} and {MAX:.1}, got {value}"
        ));
    }

    Ok(value)
}
