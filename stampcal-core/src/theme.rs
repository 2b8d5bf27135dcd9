//! Calendar color themes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Preset colors offered when creating a calendar.
pub const PALETTE: [&str; 10] = [
    "#FF6347", "#4682B4", "#3CB371", "#FFD700", "#9370DB", "#FF69B4", "#00CED1", "#FFA07A",
    "#008080", "#A0522D",
];

/// A `#RRGGBB` color token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(String);

impl Theme {
    /// Parse a color token, normalizing the hex digits to uppercase.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let token = token.trim();
        let hex = token
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| ValidationError::UnknownTheme(token.to_string()))?;

        Ok(Theme(format!("#{}", hex.to_ascii_uppercase())))
    }

    pub fn palette() -> impl Iterator<Item = Theme> {
        PALETTE.iter().map(|token| Theme(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue components, for terminals that render truecolor.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            self.0
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .unwrap_or(0)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme(PALETTE[0].to_string())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
