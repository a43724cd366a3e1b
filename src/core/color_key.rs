use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::IndexError;

/// Normalized color identity: `#RRGGBB` with uppercase hex digits.
///
/// The key stores the RGB triple itself, so two pixels with the same channels
/// always produce the same key and the textual form is derived on demand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ColorKey([u8; 3]);

impl ColorKey {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn rgb(self) -> [u8; 3] {
        self.0
    }

    /// Parse user input: surrounding whitespace is ignored and case is
    /// folded. Exactly six hex digits must remain, with no `#`.
    pub fn parse(input: &str) -> Result<Self, IndexError> {
        Self::from_digits(input.trim(), input)
    }

    /// Parse the stored `#RRGGBB` form used as snapshot map keys.
    pub fn parse_key(key: &str) -> Result<Self, IndexError> {
        match key.strip_prefix('#') {
            Some(digits) => Self::from_digits(digits, key),
            None => Err(IndexError::InvalidColorFormat(key.to_string())),
        }
    }

    fn from_digits(digits: &str, input: &str) -> Result<Self, IndexError> {
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IndexError::InvalidColorFormat(input.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| IndexError::InvalidColorFormat(input.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl From<[u8; 3]> for ColorKey {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }
}

impl FromStr for ColorKey {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl Serialize for ColorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ColorKey::parse_key(&s).map_err(serde::de::Error::custom)
    }
}
