//! Weight units, conversion and display formatting.
//!
//! Hevy reports every weight in kilograms. Reports are shown in the
//! configured display unit. Rounding is half away from zero at the
//! configured number of decimals (`f64::round` semantics).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.20462;

/// Highest supported display precision (decimal places).
pub const MAX_PRECISION: u32 = 2;

/// Unit used to display weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Kilograms (the unit Hevy stores)
    #[serde(rename = "kg", alias = "kgs", alias = "kilograms")]
    Kilograms,
    /// Pounds
    #[serde(rename = "lb", alias = "lbs", alias = "pounds")]
    Pounds,
}

impl WeightUnit {
    /// Short label used in report text.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Pounds => "lbs",
        }
    }

    /// Default weight increment for this unit (5 lb or 2.5 kg).
    #[must_use]
    pub const fn default_increment(&self) -> f64 {
        match self {
            Self::Kilograms => 2.5,
            Self::Pounds => 5.0,
        }
    }

    /// Convert a weight in kilograms to this unit (unrounded).
    #[must_use]
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            Self::Kilograms => kg,
            Self::Pounds => kg * LB_PER_KG,
        }
    }

    /// Convert a weight in this unit back to kilograms (unrounded).
    #[must_use]
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            Self::Kilograms => value,
            Self::Pounds => value / LB_PER_KG,
        }
    }
}

impl Default for WeightUnit {
    fn default() -> Self {
        Self::Pounds
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kg" | "kgs" | "kilograms" => Ok(Self::Kilograms),
            "lb" | "lbs" | "pounds" => Ok(Self::Pounds),
            other => Err(format!("unknown weight unit '{other}' (expected kg or lb)")),
        }
    }
}

/// Round `value` to `precision` decimal places, half away from zero.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// Format a number for display, dropping trailing zeros and a bare `.0`.
///
/// `115.0` renders as `115`, `52.50` as `52.5`.
#[must_use]
pub fn format_number(value: f64, precision: u32) -> String {
    let precision = precision.min(MAX_PRECISION);
    let rounded = round_to(value, precision);
    if rounded.fract() == 0.0 {
        // avoid "-0"
        return format!("{:.0}", rounded + 0.0);
    }

    let text = format!("{:.*}", precision as usize, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
