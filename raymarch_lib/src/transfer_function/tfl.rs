//! `.tfl` transfer function files.
//!
//! One knot per line, `intensity alpha` for opacity knots and
//! `intensity r g b` for color knots. Other lines are skipped.

use std::{fs, path::Path};

use log::warn;
use nalgebra::vector;
use nom::{
    character::complete::{space0, space1},
    combinator::all_consuming,
    multi::separated_list0,
    number::complete::float,
    sequence::delimited,
    IResult,
};

use super::{AlphaKnot, ColorKnot, Knot, TransferFunction};
use crate::error::TransferFunctionError;

fn numbers(s: &str) -> IResult<&str, Vec<f32>> {
    all_consuming(delimited(space0, separated_list0(space1, float), space0))(s)
}

/// Parse file contents into a transfer function of default size
pub fn parse_tfl(text: &str) -> TransferFunction {
    let mut color_knots: Vec<ColorKnot> = vec![];
    let mut alpha_knots: Vec<AlphaKnot> = vec![];

    for (line_no, line) in text.lines().enumerate() {
        let values = match numbers(line) {
            Ok((_, values)) => values,
            Err(_) => {
                warn!("Skipping malformed transfer function line {}: `{}`", line_no + 1, line);
                continue;
            }
        };

        match values.as_slice() {
            [] => {}
            &[intensity, alpha] => alpha_knots.push(Knot::new(intensity, alpha)),
            &[intensity, r, g, b] => color_knots.push(Knot::new(intensity, vector![r, g, b])),
            _ => warn!(
                "Skipping transfer function line {} with {} values",
                line_no + 1,
                values.len()
            ),
        }
    }

    let mut tf = TransferFunction::new();
    tf.set_knots(color_knots, alpha_knots);
    tf
}

/// Opacity knots first, then color knots
pub fn format_tfl(tf: &TransferFunction) -> String {
    let alpha = tf
        .alpha_knots()
        .iter()
        .map(|knot| format!("{} {}\n", knot.intensity, knot.value));
    let color = tf.color_knots().iter().map(|knot| {
        let rgb = knot.value;
        format!("{} {} {} {}\n", knot.intensity, rgb.x, rgb.y, rgb.z)
    });
    alpha.chain(color).collect()
}

pub fn read_tfl<P>(path: P) -> Result<TransferFunction, TransferFunctionError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TransferFunctionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_tfl(&text))
}

pub fn write_tfl<P>(path: P, tf: &TransferFunction) -> Result<(), TransferFunctionError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    fs::write(path, format_tfl(tf)).map_err(|source| TransferFunctionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
