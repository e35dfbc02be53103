use std::{ffi::OsString, path::PathBuf, str::FromStr};

use clap::ArgMatches;
use raymarch_lib::{
    color::{self, RGB},
    render::{IsovalueWindow, MarchSettings, RenderOptions, ViewMode},
};

fn value<T>(args: &ArgMatches, key: &str) -> Result<T, String>
where
    T: FromStr,
{
    let raw = args
        .value_of(key)
        .ok_or_else(|| format!("Missing value of {key}"))?;
    raw.parse::<T>()
        .map_err(|_| format!("Invalid value of {key}: {raw}"))
}

/// Transform `Values` into a fixed size array
fn values_to_array<T, const N: usize>(args: &ArgMatches, key: &str) -> Result<[T; N], String>
where
    T: FromStr + Copy + Default,
{
    let raw: Vec<&str> = args
        .values_of(key)
        .ok_or_else(|| format!("Missing value of {key}"))?
        .collect();
    if raw.len() != N {
        return Err(format!("{key} needs {N} values, got {}", raw.len()));
    }

    let mut out = [T::default(); N];
    for (slot, v) in out.iter_mut().zip(raw) {
        *slot = v
            .parse::<T>()
            .map_err(|_| format!("Invalid value of {key}: {v}"))?;
    }
    Ok(out)
}

/// Where the transfer function comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TfSource {
    File(PathBuf),
    Preset(String),
    /// Grayscale ramp
    Default,
}

/// Position on the orbit around the volume center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub struct Config {
    pub volume_path: PathBuf,
    pub tf: TfSource,
    pub mode: ViewMode,
    pub window: IsovalueWindow,
    pub volume_color: RGB,
    pub render_options: RenderOptions,
    pub orbit: Orbit,
    /// Images rendered, evenly spaced in yaw
    pub frames: u32,
    pub output: OsString,
}

impl Config {
    pub fn from_args(args: ArgMatches) -> Result<Config, String> {
        let volume_path = args
            .value_of_os("volume")
            .map(PathBuf::from)
            .ok_or("Missing volume file")?;

        let tf = if let Some(path) = args.value_of_os("tf") {
            TfSource::File(PathBuf::from(path))
        } else if let Some(name) = args.value_of("preset") {
            TfSource::Preset(name.to_string())
        } else {
            TfSource::Default
        };

        let mode = match args.value_of("mode") {
            Some("tf") => ViewMode::TransferFunction,
            _ => ViewMode::Isovalue,
        };

        let iso_min: u8 = value(&args, "iso-min")?;
        let iso_max: u8 = value(&args, "iso-max")?;
        let window = IsovalueWindow::from_bytes(iso_min, iso_max).map_err(|e| e.to_string())?;

        let [r, g, b] = values_to_array::<u8, 3>(&args, "color")?;
        let volume_color = color::rgb_from_bytes(r, g, b);

        let [width, height] = values_to_array::<usize, 2>(&args, "resolution")?;
        let march = MarchSettings {
            step_size: value(&args, "step")?,
            extinction_scale: value(&args, "extinction")?,
            early_termination: !args.is_present("no-ert"),
            ..Default::default()
        };
        let render_options = RenderOptions::builder()
            .resolution((width, height))
            .step_size(march.step_size)
            .extinction_scale(march.extinction_scale)
            .early_ray_termination(march.early_termination)
            .build()
            .map_err(|e| e.to_string())?;

        let orbit = Orbit {
            yaw: value(&args, "yaw")?,
            pitch: value(&args, "pitch")?,
            distance: value(&args, "distance")?,
        };

        let frames = value(&args, "frames")?;

        let output = args
            .value_of_os("output")
            .map(OsString::from)
            .ok_or("Missing output file")?;

        Ok(Config {
            volume_path,
            tf,
            mode,
            window,
            volume_color,
            render_options,
            orbit,
            frames,
            output,
        })
    }

    /// Output file of frame `index`.
    /// Single frame renders use the output name as is.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        let output = PathBuf::from(&self.output);
        if self.frames <= 1 {
            return output;
        }

        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame".into());
        let name = format!("{stem}_{index:03}.png");
        output.with_file_name(name)
    }

    /// Yaw of frame `index`, frames share one full turn
    pub fn frame_yaw(&self, index: u32) -> f32 {
        self.orbit.yaw + 360.0 * index as f32 / self.frames.max(1) as f32
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::args::get_command;

    fn config(args: &[&str]) -> Result<Config, String> {
        let mut full = vec!["vol_render", "--volume", "skull.nhdr"];
        full.extend_from_slice(args);
        let matches = get_command()
            .try_get_matches_from(full)
            .map_err(|e| e.to_string())?;
        Config::from_args(matches)
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.volume_path, PathBuf::from("skull.nhdr"));
        assert_eq!(cfg.tf, TfSource::Default);
        assert_eq!(cfg.mode, ViewMode::Isovalue);
        assert_eq!(cfg.window, IsovalueWindow::default());
        assert_eq!(cfg.volume_color, color::rgb_from_bytes(255, 100, 100));
        assert_eq!(cfg.render_options.resolution, (800, 600));
        assert_eq!(cfg.render_options.march, MarchSettings::default());
        assert_eq!(
            cfg.orbit,
            Orbit {
                yaw: -135.0,
                pitch: -30.0,
                distance: 2.5
            }
        );
        assert_eq!(cfg.frame_path(0), PathBuf::from("render.png"));
    }

    #[test]
    fn explicit_values() {
        let cfg = config(&[
            "--mode",
            "tf",
            "--preset",
            "skull",
            "--iso-min",
            "51",
            "--iso-max",
            "204",
            "--color",
            "0,255,0",
            "--resolution",
            "64,32",
            "--no-ert",
            "--step",
            "0.001",
        ])
        .unwrap();

        assert_eq!(cfg.mode, ViewMode::TransferFunction);
        assert_eq!(cfg.tf, TfSource::Preset("skull".into()));
        assert_eq!(cfg.window.min(), 0.2);
        assert_eq!(cfg.window.max(), 0.8);
        assert_eq!(cfg.volume_color, color::rgb_from_bytes(0, 255, 0));
        assert_eq!(cfg.render_options.resolution, (64, 32));
        assert!(!cfg.render_options.march.early_termination);
        assert_eq!(cfg.render_options.march.step_size, 0.001);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(config(&["--iso-min", "200", "--iso-max", "100"]).is_err());
    }

    #[test]
    fn turntable_frames() {
        let cfg = config(&["--frames", "4", "--output", "out/skull.png", "--yaw", "0"]).unwrap();
        assert_eq!(cfg.frame_path(2), PathBuf::from("out/skull_002.png"));
        assert_eq!(cfg.frame_yaw(1), 90.0);
    }
}
