//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

pub fn is_positive_number(num: &str) -> Result<(), String> {
    match num.parse::<u32>() {
        Ok(n) if n > 0 => Ok(()),
        Ok(_) => Err("Number must be greater than 0".into()),
        Err(_) => Err("Number required".into()),
    }
}

pub fn can_fit_u8(num: &str) -> Result<(), String> {
    match num.parse::<u8>() {
        Ok(_) => Ok(()),
        Err(_) => Err("Number does not fit in range <0;255>".into()),
    }
}

pub fn is_float_number(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(()),
        _ => Err("Number required".into()),
    }
}

pub fn is_positive_float(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
        Ok(_) => Err("Number must be greater than 0.0".into()),
        Err(_) => Err("Number required".into()),
    }
}

const MODE_NAMES: &[&str] = &["iso", "tf"];
const PRESET_NAMES: &[&str] = &["grayscale", "skull", "c60large"];

pub fn get_command<'a>() -> Command<'a> {
    Command::new("Vol-render")
        .version("0.1.0")
        .about("Renders volumetric data into PNG images")
        .arg(
            Arg::new("volume")
                .help("Volume file, .raw or .nhdr")
                .long("volume")
                .short('v')
                .required(true)
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("tf")
                .help("Transfer function file (.tfl)")
                .long("tf")
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .conflicts_with("preset"),
        )
        .arg(
            Arg::new("preset")
                .help("Prebuilt transfer function")
                .long("preset")
                .value_name("NAME")
                .possible_values(PRESET_NAMES),
        )
        .arg(
            Arg::new("mode")
                .help("View mode")
                .long("mode")
                .short('m')
                .default_value("iso")
                .value_name("MODE")
                .possible_values(MODE_NAMES),
        )
        .arg(
            Arg::new("iso-min")
                .help("Lower isovalue limit")
                .long("iso-min")
                .value_name("BYTE")
                .default_value("0")
                .validator(can_fit_u8),
        )
        .arg(
            Arg::new("iso-max")
                .help("Upper isovalue limit")
                .long("iso-max")
                .value_name("BYTE")
                .default_value("255")
                .validator(can_fit_u8),
        )
        .arg(
            Arg::new("color")
                .help("Volume color in isovalue mode")
                .long("color")
                .short('c')
                .number_of_values(3)
                .value_names(&["R", "G", "B"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .default_values(&["255", "100", "100"])
                .validator(can_fit_u8),
        )
        .arg(
            Arg::new("resolution")
                .help("Size of the image")
                .long("resolution")
                .short('r')
                .number_of_values(2)
                .value_names(&["W", "H"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .default_values(&["800", "600"])
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("yaw")
                .help("Camera yaw in degrees")
                .long("yaw")
                .value_name("DEG")
                .default_value("-135")
                .allow_hyphen_values(true)
                .validator(is_float_number),
        )
        .arg(
            Arg::new("pitch")
                .help("Camera pitch in degrees")
                .long("pitch")
                .value_name("DEG")
                .default_value("-30")
                .allow_hyphen_values(true)
                .validator(is_float_number),
        )
        .arg(
            Arg::new("distance")
                .help("Camera distance from the volume center")
                .long("distance")
                .value_name("DIST")
                .default_value("2.5")
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("step")
                .help("Ray marching step size")
                .long("step")
                .value_name("SIZE")
                .default_value("0.0001")
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("extinction")
                .help("Opacity to extinction multiplier")
                .long("extinction")
                .value_name("SCALE")
                .default_value("50")
                .validator(is_positive_float),
        )
        .arg(
            Arg::new("no-ert")
                .help("Disable early ray termination")
                .long("no-ert"),
        )
        .arg(
            Arg::new("frames")
                .help("Number of images, camera orbits the volume")
                .long("frames")
                .value_name("N")
                .default_value("1")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("output")
                .help("Output image")
                .long("output")
                .short('o')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .default_value_os(OsStr::new("render.png")),
        )
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn validators() {
        assert!(is_positive_number("3").is_ok());
        assert!(is_positive_number("0").is_err());
        assert!(can_fit_u8("255").is_ok());
        assert!(can_fit_u8("256").is_err());
        assert!(is_float_number("-135").is_ok());
        assert!(is_positive_float("0").is_err());
    }

    #[test]
    fn command_is_consistent() {
        get_command().debug_assert();
    }

    #[test]
    fn volume_is_required() {
        let res = get_command().try_get_matches_from(["vol_render"]);
        assert!(res.is_err());
    }

    #[test]
    fn tf_conflicts_with_preset() {
        let res = get_command().try_get_matches_from([
            "vol_render",
            "--volume",
            "a.raw",
            "--tf",
            "a.tfl",
            "--preset",
            "skull",
        ]);
        assert!(res.is_err());
    }
}
