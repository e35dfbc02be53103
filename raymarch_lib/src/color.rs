//! Color types used by the compositing code.
//!
//! Colors are `f32` vectors with channels in <0;1>.
//! Accumulated colors use straight alpha in the `w` component.

use nalgebra::{vector, Vector3, Vector4};

pub type RGBA = Vector4<f32>;

pub type RGB = Vector3<f32>;

pub fn new(r: f32, g: f32, b: f32, a: f32) -> RGBA {
    vector![r, g, b, a]
}

pub fn zero() -> RGBA {
    vector![0.0, 0.0, 0.0, 0.0]
}

pub fn mono(v: f32, opacity: f32) -> RGBA {
    vector![v, v, v, opacity]
}

pub fn from_rgb(rgb: RGB, opacity: f32) -> RGBA {
    vector![rgb.x, rgb.y, rgb.z, opacity]
}

/// Color from 8bit channels, as picked in a color picker
pub fn rgb_from_bytes(r: u8, g: u8, b: u8) -> RGB {
    vector![r as f32, g as f32, b as f32] / 255.0
}

/// Blend `src` over an opaque `background`.
///
/// Same equation as `glBlendFunc(GL_SRC_ALPHA, GL_ONE_MINUS_SRC_ALPHA)`.
pub fn blend_over(src: &RGBA, background: &RGB) -> RGB {
    let alpha = src.w.clamp(0.0, 1.0);
    src.xyz() * alpha + background * (1.0 - alpha)
}

pub fn to_bytes(rgb: &RGB) -> [u8; 3] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(rgb.x), q(rgb.y), q(rgb.z)]
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn opaque_source_hides_background() {
        let src = new(1.0, 0.0, 0.0, 1.0);
        let out = blend_over(&src, &vector![1.0, 1.0, 1.0]);
        assert_eq!(out, vector![1.0, 0.0, 0.0]);
    }

    #[test]
    fn transparent_source_shows_background() {
        let out = blend_over(&zero(), &vector![0.2, 0.4, 0.6]);
        assert_eq!(out, vector![0.2, 0.4, 0.6]);
    }

    #[test]
    fn byte_conversion() {
        assert_eq!(to_bytes(&vector![0.0, 1.0, 2.0]), [0, 255, 255]);
        assert_eq!(rgb_from_bytes(255, 0, 51), vector![1.0, 0.0, 0.2]);
    }
}
