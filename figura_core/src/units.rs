// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measures: a numeric value plus a unit, with per-property precision and
//! range constraints.
//!
//! Physical coordinates throughout the crate are milli-inches with y
//! increasing upward. Relative units ([`Unit::Percent`], [`Unit::User`]) are
//! resolved against the viewport of the parent container, see
//! [`Viewport2D::measure_point`](crate::viewport::Viewport2D::measure_point).

use core::fmt;

/// Milli-inches per inch.
pub const MILLI_IN_PER_IN: f64 = 1000.0;
/// Milli-inches per centimeter.
pub const MILLI_IN_PER_CM: f64 = 1000.0 / 2.54;
/// Milli-inches per millimeter.
pub const MILLI_IN_PER_MM: f64 = 100.0 / 2.54;
/// Milli-inches per typographic point.
pub const MILLI_IN_PER_PT: f64 = 1000.0 / 72.0;

/// The unit of a [`Measure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Inches.
    In,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Typographic points (1/72 in).
    Pt,
    /// Percentage of the parent viewport's extent.
    Percent,
    /// User (data) units of the parent container.
    User,
}

impl Unit {
    /// Milli-inches per unit, or `None` for relative units.
    #[must_use]
    pub const fn milli_in(self) -> Option<f64> {
        match self {
            Self::In => Some(MILLI_IN_PER_IN),
            Self::Cm => Some(MILLI_IN_PER_CM),
            Self::Mm => Some(MILLI_IN_PER_MM),
            Self::Pt => Some(MILLI_IN_PER_PT),
            Self::Percent | Self::User => None,
        }
    }

    /// The suffix used when formatting a measure.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Pt => "pt",
            Self::Percent => "%",
            Self::User => "u",
        }
    }
}

/// A numeric value with a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measure {
    /// The numeric value.
    pub value: f64,
    /// The unit the value is expressed in.
    pub unit: Unit,
}

impl Measure {
    /// Creates a measure.
    #[inline]
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A measure in inches.
    #[inline]
    #[must_use]
    pub const fn inches(value: f64) -> Self {
        Self::new(value, Unit::In)
    }

    /// A measure in points.
    #[inline]
    #[must_use]
    pub const fn points(value: f64) -> Self {
        Self::new(value, Unit::Pt)
    }

    /// A measure in percent of the parent viewport.
    #[inline]
    #[must_use]
    pub const fn percent(value: f64) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// A measure in user units.
    #[inline]
    #[must_use]
    pub const fn user(value: f64) -> Self {
        Self::new(value, Unit::User)
    }

    /// Returns whether the unit must be resolved against a viewport.
    #[inline]
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        matches!(self.unit, Unit::Percent | Unit::User)
    }

    /// The physical length in milli-inches, or `None` for relative units.
    #[must_use]
    pub fn to_milli_in(&self) -> Option<f64> {
        self.unit.milli_in().map(|k| self.value * k)
    }

    /// Re-expresses a physical length (milli-inches) in `unit`.
    ///
    /// Returns `None` for relative units.
    #[must_use]
    pub fn from_milli_in(milli_in: f64, unit: Unit) -> Option<Self> {
        unit.milli_in().map(|k| Self::new(milli_in / k, unit))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Validation and precision limits for a measured property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureConstraints {
    /// Whether [`Unit::Percent`] is accepted.
    pub allow_percent: bool,
    /// Whether [`Unit::User`] is accepted.
    pub allow_user: bool,
    /// Minimum physical value in milli-inches (inclusive).
    pub min: f64,
    /// Maximum physical value in milli-inches (inclusive).
    pub max: f64,
    /// Whether zero and negative values are rejected.
    pub require_positive: bool,
    /// Maximum number of significant digits kept.
    pub max_sig_digits: u8,
    /// Maximum number of fractional digits kept.
    pub max_frac_digits: u8,
}

impl MeasureConstraints {
    /// Locations of nodes within their parent.
    pub const LOCATION: Self = Self {
        allow_percent: true,
        allow_user: true,
        min: -100_000.0,
        max: 100_000.0,
        require_positive: false,
        max_sig_digits: 6,
        max_frac_digits: 3,
    };

    /// Widths and heights of boxes.
    pub const SIZE: Self = Self {
        allow_percent: true,
        allow_user: false,
        min: 0.0,
        max: 100_000.0,
        require_positive: true,
        max_sig_digits: 6,
        max_frac_digits: 3,
    };

    /// Stroke widths.
    pub const STROKE: Self = Self {
        allow_percent: false,
        allow_user: false,
        min: 0.0,
        max: 1000.0,
        require_positive: false,
        max_sig_digits: 4,
        max_frac_digits: 3,
    };

    /// Small decorations: tick lengths, spacers, symbol and cap sizes.
    pub const DECORATION: Self = Self {
        allow_percent: false,
        allow_user: false,
        min: 0.0,
        max: 5000.0,
        require_positive: false,
        max_sig_digits: 4,
        max_frac_digits: 3,
    };

    /// Offsets that may be negative, such as axis label offsets.
    pub const OFFSET: Self = Self {
        allow_percent: false,
        allow_user: false,
        min: -5000.0,
        max: 5000.0,
        require_positive: false,
        max_sig_digits: 4,
        max_frac_digits: 3,
    };

    /// Checks `m` against these constraints and rounds it to the allowed
    /// precision.
    ///
    /// Returns `None` if the unit is not allowed, the value is not finite,
    /// or the value lies outside the permitted range.
    #[must_use]
    pub fn constrain(&self, m: Measure) -> Option<Measure> {
        if !m.value.is_finite() {
            return None;
        }
        match m.unit {
            Unit::Percent if !self.allow_percent => return None,
            Unit::User if !self.allow_user => return None,
            _ => {}
        }
        let value = round_frac(round_sig(m.value, self.max_sig_digits), self.max_frac_digits);
        if self.require_positive && value <= 0.0 {
            return None;
        }
        match m.unit.milli_in() {
            Some(k) => {
                let phys = value * k;
                if phys < self.min || phys > self.max {
                    return None;
                }
            }
            None if m.unit == Unit::Percent => {
                if !(-1000.0..=1000.0).contains(&value) {
                    return None;
                }
                if !self.allow_negative_relative() && value < 0.0 {
                    return None;
                }
            }
            None => {}
        }
        Some(Measure::new(value, m.unit))
    }

    fn allow_negative_relative(&self) -> bool {
        self.min < 0.0
    }
}

/// Rounds `v` to at most `digits` significant digits.
fn round_sig(v: f64, digits: u8) -> f64 {
    if v == 0.0 || digits == 0 {
        return v;
    }
    let magnitude = v.abs().log10().floor() as i32 + 1;
    let shift = i32::from(digits) - magnitude;
    let k = 10f64.powi(shift);
    (v * k).round() / k
}

/// Rounds `v` to at most `digits` fractional digits.
fn round_frac(v: f64, digits: u8) -> f64 {
    let k = 10f64.powi(i32::from(digits));
    (v * k).round() / k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_conversions() {
        assert_eq!(Measure::inches(2.5).to_milli_in(), Some(2500.0));
        assert_eq!(Measure::points(72.0).to_milli_in(), Some(1000.0));
        assert_eq!(Measure::percent(50.0).to_milli_in(), None);
        let cm = Measure::from_milli_in(1000.0, Unit::Cm).unwrap();
        assert!((cm.value - 2.54).abs() < 1e-9, "got {cm}");
    }

    #[test]
    fn constrain_rounds_precision() {
        let m = MeasureConstraints::LOCATION
            .constrain(Measure::inches(1.234_567_89))
            .unwrap();
        assert_eq!(m.value, 1.235);
        let big = MeasureConstraints::LOCATION
            .constrain(Measure::user(123_456_789.0))
            .unwrap();
        assert!((big.value - 123_457_000.0).abs() < 1e-3, "got {big}");
    }

    #[test]
    fn constrain_rejects_bad_values() {
        let c = MeasureConstraints::SIZE;
        assert!(c.constrain(Measure::inches(0.0)).is_none(), "zero size");
        assert!(c.constrain(Measure::inches(-1.0)).is_none(), "negative size");
        assert!(c.constrain(Measure::user(1.0)).is_none(), "user units");
        assert!(c.constrain(Measure::inches(f64::NAN)).is_none(), "NaN");
        assert!(c.constrain(Measure::inches(101.0)).is_none(), "too large");
        assert!(c.constrain(Measure::percent(-5.0)).is_none(), "negative %");
        assert!(
            MeasureConstraints::STROKE
                .constrain(Measure::percent(5.0))
                .is_none(),
            "percent stroke"
        );
    }
}
