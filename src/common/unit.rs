//! Unit conversion utilities.
//!
//! WordprocessingML measures drawings in EMUs, page geometry in twips and
//! font sizes in half-points. [`Length`] stores EMUs and converts on demand.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_TWIP: i64 = 635;

#[inline]
pub fn px_to_emu(px: u32, dpi: u32) -> i64 {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi as f64) as i64
}

#[inline]
pub fn emu_to_twip_i64(emu: i64) -> i64 {
    (emu as f64 / EMUS_PER_TWIP as f64).round() as i64
}

/// Length measurement stored in EMUs (English Metric Units).
///
/// - 1 inch = 914,400 EMUs
/// - 1 cm = 360,000 EMUs
/// - 1 pt = 12,700 EMUs
///
/// Parses from strings with a unit suffix, which is how lengths appear in
/// configuration files.
///
/// # Examples
///
/// ```
/// use docx_compose::Length;
///
/// let width = Length::cm(17.8);
/// assert_eq!(width, "17.8cm".parse::<Length>().unwrap());
/// assert_eq!(Length::pt(12.0).twips(), 240);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length {
    emus: i64,
}

impl Length {
    #[inline]
    pub const fn from_emus(emus: i64) -> Self {
        Self { emus }
    }

    #[inline]
    pub fn inches(inches: f64) -> Self {
        Self::from_emus((inches * EMUS_PER_INCH as f64).round() as i64)
    }

    #[inline]
    pub fn cm(cm: f64) -> Self {
        Self::from_emus((cm * EMUS_PER_CM as f64).round() as i64)
    }

    #[inline]
    pub fn mm(mm: f64) -> Self {
        Self::from_emus((mm * EMUS_PER_MM as f64).round() as i64)
    }

    #[inline]
    pub fn pt(pt: f64) -> Self {
        Self::from_emus((pt * EMUS_PER_PT as f64).round() as i64)
    }

    #[inline]
    pub const fn from_twips(twips: i64) -> Self {
        Self::from_emus(twips.saturating_mul(EMUS_PER_TWIP))
    }

    /// Get the value in EMUs.
    #[inline]
    pub const fn emus(&self) -> i64 {
        self.emus
    }

    /// Value in twips (1/20 pt), rounded to the nearest twip.
    #[inline]
    pub fn twips(&self) -> i64 {
        emu_to_twip_i64(self.emus)
    }

    /// Value in half-points, the unit of `w:sz`.
    #[inline]
    pub fn half_points(&self) -> i64 {
        (self.emus as f64 * 2.0 / EMUS_PER_PT as f64).round() as i64
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse a length such as `"2.5cm"`, `"10pt"`, `"1in"`, `"5mm"`,
    /// `"240twip"` or `"914400emu"`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);

        if number.is_empty() {
            return Err(Error::Config(format!("No numeric value found in '{}'", s)));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| Error::Config(format!("Failed to parse numeric value from '{}'", s)))?;

        let length = match unit.trim() {
            "cm" => Self::cm(value),
            "mm" => Self::mm(value),
            "pt" => Self::pt(value),
            "in" | "inch" => Self::inches(value),
            "twip" | "twips" | "dxa" => Self::from_emus((value * EMUS_PER_TWIP as f64).round() as i64),
            "emu" | "" => Self::from_emus(value.round() as i64),
            other => return Err(Error::Config(format!("Unknown length unit '{}'", other))),
        };

        Ok(length)
    }
}

impl TryFrom<String> for Length {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

impl fmt::Display for Length {
    /// Formats in the largest unit that represents the value exactly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.emus % EMUS_PER_MM == 0 {
            let mm = self.emus / EMUS_PER_MM;
            if mm % 10 == 0 {
                write!(f, "{}cm", mm / 10)
            } else {
                write!(f, "{}mm", mm)
            }
        } else if self.emus % EMUS_PER_PT == 0 {
            write!(f, "{}pt", self.emus / EMUS_PER_PT)
        } else {
            write!(f, "{}emu", self.emus)
        }
    }
}
