//! RGB color used by embeds and roles

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ArgumentError;
use crate::guard;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// Largest valid raw value (`0xFFFFFF`)
    pub const MAX_VALUE: u32 = 0x00FF_FFFF;

    /// Create a color from its raw value
    pub fn new(raw_value: u32) -> Result<Self, ArgumentError> {
        if raw_value > Self::MAX_VALUE {
            return Err(ArgumentError::OutOfRange {
                name: "raw_value",
                message: format!("must be less than or equal to {}", Self::MAX_VALUE),
            });
        }
        Ok(Self(raw_value))
    }

    /// Create a color from RGB bytes
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Create a color from RGB components in `0.0..=1.0`
    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Result<Self, ArgumentError> {
        guard::in_range("r", r, 0.0, 1.0)?;
        guard::in_range("g", g, 0.0, 1.0)?;
        guard::in_range("b", b, 0.0, 1.0)?;

        Ok(Self::from_rgb(
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
        ))
    }

    /// Create a color from hue (degrees), saturation and value (`0.0..=1.0`)
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Result<Self, ArgumentError> {
        guard::in_range("s", s, 0.0, 1.0)?;
        guard::in_range("v", v, 0.0, 1.0)?;

        if s == 0.0 {
            return Self::from_rgb_f32(v, v, v);
        }

        let sector = (h / 60.0).floor();
        let f = h / 60.0 - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector.rem_euclid(6.0) as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::from_rgb_f32(r, g, b)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb(r, g, b)
    }
}

impl From<Color> for (u8, u8, u8) {
    fn from(color: Color) -> Self {
        (color.r(), color.g(), color.b())
    }
}

impl TryFrom<u32> for Color {
    type Error = ArgumentError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
