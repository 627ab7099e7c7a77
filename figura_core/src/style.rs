// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inheritable style attributes.
//!
//! Every node carries a [`Style`] whose fields are either explicit
//! (`Some`) or inherited from the parent (`None`). The root figure resolves
//! any missing attribute to [`ResolvedStyle::default_root`].

use core::fmt;

use crate::units::Measure;

/// An sRGB color with alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `RRGGBB` or `AARRGGBB` hex, with an optional leading `#`.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let v = u32::from_str_radix(s, 16).ok()?;
        let [a, r, g, b] = v.to_be_bytes();
        match s.len() {
            6 => Some(Self::rgb(r, g, b)),
            8 => Some(Self::rgba(r, g, b, a)),
            _ => None,
        }
    }

    /// Returns whether the color is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.a, self.r, self.g, self.b)
        }
    }
}

/// Font weight and posture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Regular.
    #[default]
    Plain,
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Bold italic.
    BoldItalic,
}

/// The explicit style attributes of one node.
///
/// `None` means "inherit from the parent".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Font family name.
    pub font_family: Option<String>,
    /// Font weight and posture.
    pub font_style: Option<FontStyle>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Fill color.
    pub fill_color: Option<Color>,
    /// Stroke color.
    pub stroke_color: Option<Color>,
    /// Stroke width.
    pub stroke_width: Option<Measure>,
}

impl Style {
    /// A style with every attribute explicit, as carried by the root.
    #[must_use]
    pub fn explicit(resolved: &ResolvedStyle) -> Self {
        Self {
            font_family: Some(resolved.font_family.clone()),
            font_style: Some(resolved.font_style),
            font_size: Some(resolved.font_size),
            fill_color: Some(resolved.fill_color),
            stroke_color: Some(resolved.stroke_color),
            stroke_width: Some(resolved.stroke_width),
        }
    }

    /// Fills every inherited attribute of `self` from `parent`.
    pub(crate) fn resolve_onto(&self, parent: &mut ResolvedStyle) {
        if let Some(v) = &self.font_family {
            parent.font_family.clone_from(v);
        }
        if let Some(v) = self.font_style {
            parent.font_style = v;
        }
        if let Some(v) = self.font_size {
            parent.font_size = v;
        }
        if let Some(v) = self.fill_color {
            parent.fill_color = v;
        }
        if let Some(v) = self.stroke_color {
            parent.stroke_color = v;
        }
        if let Some(v) = self.stroke_width {
            parent.stroke_width = v;
        }
    }
}

/// A fully resolved style: every attribute has a value.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    /// Font family name.
    pub font_family: String,
    /// Font weight and posture.
    pub font_style: FontStyle,
    /// Font size in points.
    pub font_size: f64,
    /// Fill color.
    pub fill_color: Color,
    /// Stroke color.
    pub stroke_color: Color,
    /// Stroke width.
    pub stroke_width: Measure,
}

impl ResolvedStyle {
    /// The style a freshly created figure starts with.
    pub const DEFAULT_FONT: &'static str = "Arial";

    /// Returns the default root style.
    #[must_use]
    pub fn default_root() -> Self {
        Self {
            font_family: Self::DEFAULT_FONT.to_owned(),
            font_style: FontStyle::Plain,
            font_size: 12.0,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            stroke_width: Measure::inches(0.01),
        }
    }

    /// Stroke width in milli-inches.
    #[must_use]
    pub fn stroke_milli_in(&self) -> f64 {
        self.stroke_width.to_milli_in().unwrap_or(0.0)
    }

    /// Font size in milli-inches.
    #[must_use]
    pub fn font_milli_in(&self) -> f64 {
        self.font_size * crate::units::MILLI_IN_PER_PT
    }
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self::default_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_hex("80ffffff"),
            Some(Color::rgba(255, 255, 255, 128))
        );
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn explicit_attributes_override_parent() {
        let mut resolved = ResolvedStyle::default_root();
        let style = Style {
            font_size: Some(8.0),
            stroke_color: Some(Color::WHITE),
            ..Style::default()
        };
        style.resolve_onto(&mut resolved);
        assert_eq!(resolved.font_size, 8.0);
        assert_eq!(resolved.stroke_color, Color::WHITE);
        assert_eq!(resolved.font_family, "Arial");
    }
}
