// 🔢 Barcode - EAN-13 value type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in an EAN-13 barcode
pub const BARCODE_LEN: usize = 13;

/// A 13-digit EAN-13 barcode.
///
/// Only constructible through [`Barcode::parse`], so every value in the
/// catalog and correction tables has already passed format validation.
/// The check digit is not verified: the station must still be able to look
/// up the mislabelled codes recorded in the corrections file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Parse a raw scan. Returns None unless the input is exactly 13 ASCII digits.
    pub fn parse(raw: &str) -> Option<Barcode> {
        if is_valid_format(raw) {
            Some(Barcode(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Format check applied to scans before any lookup
pub fn is_valid_format(raw: &str) -> bool {
    raw.len() == BARCODE_LEN && raw.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Barcode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_format(&value) {
            Ok(Barcode(value))
        } else {
            Err(format!("'{}' is not a 13-digit barcode", value))
        }
    }
}

impl From<Barcode> for String {
    fn from(barcode: Barcode) -> Self {
        barcode.0
    }
}
