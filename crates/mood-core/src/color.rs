//! Small color types shared by presets, layers and overlays.

use std::fmt;

/// 8-bit RGB with a floating alpha, matching how CSS colors are written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::hex(0x000000);
    pub const WHITE: Rgba = Rgba::hex(0xffffff);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba(...)` form.
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Three-stop top-to-bottom gradient used for the sky band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient(pub [Rgba; 3]);

impl Gradient {
    pub fn lerp(&self, other: &Gradient, t: f32) -> Gradient {
        Gradient([
            self.0[0].lerp(other.0[0], t),
            self.0[1].lerp(other.0[1], t),
            self.0[2].lerp(other.0[2], t),
        ])
    }

    pub fn css(&self) -> String {
        format!(
            "linear-gradient(to bottom, {}, {}, {})",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

/// Mix mode of the full-screen tint overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Overlay,
    Multiply,
    ColorBurn,
    SoftLight,
    Screen,
}

impl BlendMode {
    pub fn css(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Overlay => "overlay",
            BlendMode::Multiply => "multiply",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Screen => "screen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let c = Rgba::hex(0x38bdf8);
        assert_eq!((c.r, c.g, c.b), (0x38, 0xbd, 0xf8));
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Rgba::hex(0x000000);
        let b = Rgba::rgba(200, 100, 50, 0.5);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).r, 100);
    }
}
