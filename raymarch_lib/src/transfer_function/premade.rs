// Prebuilt transfer functions for datasets used in development.
// Intensities are 8bit sample values.

use nalgebra::vector;

use super::TransferFunction;
use crate::color::{self, RGB};

/// Opaque band of color between `low` and `high` intensities
struct Band {
    low: f32,
    high: f32,
    rgb: RGB,
    alpha: f32,
}

fn from_bands(bands: &[Band]) -> TransferFunction {
    let mut tf = TransferFunction::new();
    tf.add_alpha_knot(0.0, 0.0);
    for band in bands {
        tf.add_alpha_knot(band.low, 0.0);
        tf.add_alpha_knot(band.low + 1.0, band.alpha);
        tf.add_alpha_knot(band.high - 1.0, band.alpha);
        tf.add_alpha_knot(band.high, 0.0);
        tf.add_color_knot(band.low, band.rgb);
        tf.add_color_knot(band.high, band.rgb);
    }
    tf
}

/// Linear ramp, white and more opaque with rising density
pub fn grayscale() -> TransferFunction {
    let mut tf = TransferFunction::new();
    tf.add_color_knot(0.0, vector![0.0, 0.0, 0.0]);
    tf.add_color_knot(255.0, vector![1.0, 1.0, 1.0]);
    tf.add_alpha_knot(0.0, 0.0);
    tf.add_alpha_knot(255.0, 1.0);
    tf
}

/// Skull CT, red bone over faint green tissue
pub fn skull() -> TransferFunction {
    from_bands(&[
        Band {
            low: 130.0,
            high: 170.0,
            rgb: color::rgb_from_bytes(0, 220, 0),
            alpha: 0.04,
        },
        Band {
            low: 170.0,
            high: 255.0,
            rgb: color::rgb_from_bytes(220, 0, 20),
            alpha: 0.1,
        },
    ])
}

/// Fullerene, three shells
pub fn c60large() -> TransferFunction {
    from_bands(&[
        Band {
            low: 80.0,
            high: 120.0,
            rgb: color::rgb_from_bytes(2, 2, 60),
            alpha: 0.02,
        },
        Band {
            low: 200.0,
            high: 230.0,
            rgb: color::rgb_from_bytes(0, 180, 0),
            alpha: 0.3,
        },
        Band {
            low: 230.0,
            high: 255.0,
            rgb: color::rgb_from_bytes(200, 0, 0),
            alpha: 0.5,
        },
    ])
}

/// Transfer function by name, as used on the command line
pub fn by_name(name: &str) -> Option<TransferFunction> {
    match name {
        "grayscale" => Some(grayscale()),
        "skull" => Some(skull()),
        "c60large" => Some(c60large()),
        _ => None,
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn skull_bands() {
        let lut = skull().bake();
        assert_eq!(lut.entries()[100].w, 0.0);
        assert_eq!(lut.entries()[150].w, 0.04);
        assert_eq!(lut.entries()[200].w, 0.1);
        assert!(lut.entries()[200].x > lut.entries()[200].y);
    }

    #[test]
    fn names() {
        assert!(by_name("grayscale").is_some());
        assert!(by_name("c60large").is_some());
        assert!(by_name("beetle").is_none());
    }
}
