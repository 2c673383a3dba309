//! Visual style values animated by the scene.
//!
//! A [`VisualStyle`] is the explicit, per-kind replacement for a loose
//! style-property bag: edges animate color and width, nodes animate the
//! fill fraction of their pie slice.

use std::fmt;

use glam::Vec3;

/// An opaque RGB color parsed from `#rgb` or `#rrggbb` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Color from raw channel values.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color (`#rgb` or `#rrggbb`, case-insensitive).
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, digit) in channels.iter_mut().zip(hex.chars()) {
                    let v = digit.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Some(Self::rgb(
                    channel(0).ok()?,
                    channel(2).ok()?,
                    channel(4).ok()?,
                ))
            }
            _ => None,
        }
    }

    /// Normalized channels in [0, 1].
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// Color from normalized channels, clamped and rounded.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        let c = (v.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        Self::rgb(c.x as u8, c.y as u8, c.z as u8)
    }

    /// Linear interpolation in normalized RGB space.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::from_vec3(self.to_vec3().lerp(other.to_vec3(), t))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The animatable style of one graph element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualStyle {
    /// Edge line style. The color applies to the line and both arrow heads.
    Edge {
        /// Line and arrow color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
    /// Node pie-chart style.
    Node {
        /// Size of the first pie slice.
        pie_fraction: f32,
    },
}

impl VisualStyle {
    /// Interpolate towards `target` at eased progress `t`.
    ///
    /// Mismatched kinds snap straight to `target`.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        match (*self, *target) {
            (
                Self::Edge { color, width },
                Self::Edge {
                    color: to_color,
                    width: to_width,
                },
            ) => Self::Edge {
                color: color.lerp(to_color, t),
                width: width + (to_width - width) * t,
            },
            (
                Self::Node { pie_fraction },
                Self::Node {
                    pie_fraction: to_fraction,
                },
            ) => Self::Node {
                pie_fraction: pie_fraction + (to_fraction - pie_fraction) * t,
            },
            _ => *target,
        }
    }
}
