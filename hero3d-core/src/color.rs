//! RGB colors and `#rrggbb` literal parsing

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map_res},
    sequence::{preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::error::SceneError;

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse a `#rrggbb` or `#rgb` literal
    pub fn from_hex(literal: &str) -> Result<Self, SceneError> {
        match all_consuming(hex_color)(literal.trim()) {
            Ok((_, color)) => Ok(color),
            Err(_) => Err(SceneError::InvalidColor(literal.to_string())),
        }
    }

    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Component-wise product
    pub fn tint(self, other: Rgb) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Linear blend, `t = 0` is `self` and `t = 1` is `other`
    pub fn mix(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Perceived brightness (Rec. 709 weights)
    pub fn luminance(self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Add for Rgb {
    type Output = Rgb;

    fn add(self, other: Rgb) -> Rgb {
        Rgb::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex), |s| u8::from_str_radix(s, 16))(input)
}

// `#abc` expands each nibble to `aa`, `bb`, `cc`
fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

fn long_form(input: &str) -> IResult<&str, Rgb> {
    let (input, (r, g, b)) = tuple((hex_byte, hex_byte, hex_byte))(input)?;
    Ok((input, Rgb::from_u8(r, g, b)))
}

fn short_form(input: &str) -> IResult<&str, Rgb> {
    let (input, (r, g, b)) = tuple((hex_nibble, hex_nibble, hex_nibble))(input)?;
    Ok((input, Rgb::from_u8(r, g, b)))
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    preceded(tag("#"), alt((long_form, short_form)))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let color = Rgb::from_hex("#6be6ff").unwrap();
        assert_eq!(color.to_u8(), (0x6b, 0xe6, 0xff));
        assert_eq!(color.to_hex(), "#6be6ff");
    }

    #[test]
    fn test_parse_short_form() {
        let color = Rgb::from_hex("#fa0").unwrap();
        assert_eq!(color.to_u8(), (0xff, 0xaa, 0x00));
    }

    #[test]
    fn test_reject_malformed() {
        for literal in ["6be6ff", "#6be6f", "#6be6ffaa", "#ggg", "", "#"] {
            assert!(
                matches!(Rgb::from_hex(literal), Err(SceneError::InvalidColor(_))),
                "{literal:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_mix_is_clamped() {
        let a = Rgb::BLACK;
        let b = Rgb::WHITE;
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 2.0), b);
        assert!((a.mix(b, 0.5).g - 0.5).abs() < 1e-6);
    }
}
