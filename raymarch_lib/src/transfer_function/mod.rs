//! Transfer functions mapping density to color and opacity.
//!
//! A [`TransferFunction`] is edited as two sorted lists of knots and baked
//! into a [`TransferLut`], a fixed size table sampled during rendering.

use std::ops::{Add, Mul, Sub};

use nalgebra::vector;

use crate::{
    color::{self, RGB, RGBA},
    error::TransferFunctionError,
};

pub mod premade;
mod tfl;

pub use tfl::{format_tfl, parse_tfl, read_tfl, write_tfl};

/// Number of table entries, one per 8bit intensity
pub const DEFAULT_LUT_SIZE: usize = 256;

/// Control point of a piecewise linear function.
/// `intensity` lives in `<0;size-1>` of the owning transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knot<V> {
    pub intensity: f32,
    pub value: V,
}

pub type ColorKnot = Knot<RGB>;

pub type AlphaKnot = Knot<f32>;

impl<V> Knot<V> {
    pub fn new(intensity: f32, value: V) -> Knot<V> {
        Knot { intensity, value }
    }
}

/// Editable transfer function
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    size: usize,
    color_knots: Vec<ColorKnot>,
    alpha_knots: Vec<AlphaKnot>,
}

impl TransferFunction {
    /// Empty function with [`DEFAULT_LUT_SIZE`] entries
    pub fn new() -> TransferFunction {
        TransferFunction {
            size: DEFAULT_LUT_SIZE,
            color_knots: vec![],
            alpha_knots: vec![],
        }
    }

    pub fn with_size(size: usize) -> Result<TransferFunction, TransferFunctionError> {
        if size < 2 {
            return Err(TransferFunctionError::InvalidSize(size));
        }
        Ok(TransferFunction {
            size,
            ..TransferFunction::new()
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn color_knots(&self) -> &[ColorKnot] {
        &self.color_knots
    }

    pub fn alpha_knots(&self) -> &[AlphaKnot] {
        &self.alpha_knots
    }

    /// No knots at all, bakes into a fully transparent table
    pub fn is_empty(&self) -> bool {
        self.color_knots.is_empty() && self.alpha_knots.is_empty()
    }

    /// Insert knot, knots with the same intensity keep insertion order
    pub fn add_color_knot(&mut self, intensity: f32, rgb: RGB) {
        insert_sorted(&mut self.color_knots, Knot::new(intensity, rgb));
    }

    pub fn add_alpha_knot(&mut self, intensity: f32, alpha: f32) {
        insert_sorted(&mut self.alpha_knots, Knot::new(intensity, alpha));
    }

    /// Replace all knots
    pub fn set_knots(&mut self, mut color_knots: Vec<ColorKnot>, mut alpha_knots: Vec<AlphaKnot>) {
        color_knots.sort_by(|a, b| a.intensity.total_cmp(&b.intensity));
        alpha_knots.sort_by(|a, b| a.intensity.total_cmp(&b.intensity));
        self.color_knots = color_knots;
        self.alpha_knots = alpha_knots;
    }

    /// Color and opacity at `intensity`, channels clamped to `<0;1>`
    pub fn evaluate(&self, intensity: f32) -> RGBA {
        let rgb = interpolate(&self.color_knots, intensity).unwrap_or_else(RGB::zeros);
        let alpha = interpolate(&self.alpha_knots, intensity).unwrap_or(0.0);
        color::from_rgb(rgb, alpha).map(|c| c.clamp(0.0, 1.0))
    }

    /// Table with entry `i` evaluated at intensity `i`
    pub fn bake(&self) -> TransferLut {
        let entries = (0..self.size).map(|i| self.evaluate(i as f32)).collect();
        TransferLut { entries }
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        TransferFunction::new()
    }
}

fn insert_sorted<V>(knots: &mut Vec<Knot<V>>, knot: Knot<V>) {
    let index = knots.partition_point(|k| k.intensity <= knot.intensity);
    knots.insert(index, knot);
}

/// Piecewise linear interpolation, constant outside of the knot range.
/// `None` without knots.
fn interpolate<V>(knots: &[Knot<V>], x: f32) -> Option<V>
where
    V: Copy + Add<Output = V> + Sub<Output = V> + Mul<f32, Output = V>,
{
    let first = knots.first()?;
    let last = knots.last()?;

    if x <= first.intensity {
        return Some(first.value);
    }
    if x >= last.intensity {
        return Some(last.value);
    }

    knots
        .windows(2)
        .find(|w| w[0].intensity <= x && x <= w[1].intensity)
        .map(|w| {
            let span = w[1].intensity - w[0].intensity;
            if span <= 0.0 {
                return w[1].value;
            }
            let t = (x - w[0].intensity) / span;
            w[0].value + (w[1].value - w[0].value) * t
        })
}

/// Baked transfer function, sampled like a linearly filtered 1D texture
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLut {
    entries: Vec<RGBA>,
}

impl TransferLut {
    pub fn new(entries: Vec<RGBA>) -> Result<TransferLut, TransferFunctionError> {
        if entries.len() < 2 {
            return Err(TransferFunctionError::InvalidSize(entries.len()));
        }
        Ok(TransferLut { entries })
    }

    /// Table of `size` entries, `f` gets the entry index
    pub fn from_fn<F>(size: usize, f: F) -> Result<TransferLut, TransferFunctionError>
    where
        F: Fn(usize) -> RGBA,
    {
        TransferLut::new((0..size).map(f).collect())
    }

    pub fn entries(&self) -> &[RGBA] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color and opacity for `density` in `<0;1>`.
    ///
    /// Entries sit at texel centers, values between them are interpolated
    /// and densities outside the range use the edge entries.
    pub fn lookup(&self, density: f32) -> RGBA {
        let len = self.entries.len();
        let hi = (len - 1) as f32;
        let x = (density * len as f32 - 0.5).max(0.0).min(hi);
        let i0 = x.floor() as usize;
        let i1 = usize::min(i0 + 1, len - 1);
        let t = x - i0 as f32;

        let (c0, c1) = (self.entries[i0], self.entries[i1]);
        c0 + (c1 - c0) * t
    }
}

impl Default for TransferLut {
    /// Fully transparent
    fn default() -> Self {
        TransferLut {
            entries: vec![vector![0.0, 0.0, 0.0, 0.0]; DEFAULT_LUT_SIZE],
        }
    }
}
