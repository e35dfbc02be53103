use std::error::Error;

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use nalgebra::{point, vector};
use raymarch_lib::{
    render::{Renderer, ViewParameters},
    transfer_function::{premade, read_tfl, TransferLut},
    volumetric, ArcballCamera, Camera,
};

mod args;
mod config;

use crate::{
    args::get_command,
    config::{Config, TfSource},
};

fn load_transfer_function(source: &TfSource) -> Result<TransferLut, Box<dyn Error>> {
    let tf = match source {
        TfSource::File(path) => read_tfl(path)?,
        TfSource::Preset(name) => {
            premade::by_name(name).ok_or_else(|| format!("Unknown preset {name}"))?
        }
        TfSource::Default => premade::grayscale(),
    };
    Ok(tf.bake())
}

fn render(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let volume = volumetric::from_file(&cfg.volume_path)?;
    let lut = load_transfer_function(&cfg.tf)?;

    let view = ViewParameters {
        mode: cfg.mode,
        window: cfg.window,
        volume_color: cfg.volume_color,
        ..Default::default()
    };

    let renderer = Renderer::new(cfg.render_options)?;
    let (width, height) = cfg.render_options.resolution;

    let mut camera = ArcballCamera::new(
        point![0.5, 0.5, 0.5],
        cfg.orbit.distance,
        cfg.orbit.yaw,
        cfg.orbit.pitch,
    );
    camera.change_aspect_from_resolution(width, height);

    let background = vector![1.0, 1.0, 1.0];

    for index in 0..cfg.frames {
        camera.set_yaw(cfg.frame_yaw(index));

        let progress = ProgressBar::new(height as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows"),
        );

        let frame = renderer.render_with_progress(&camera, &volume, &lut, &view, || progress.inc(1));
        progress.finish_and_clear();

        let image = RgbImage::from_raw(width as u32, height as u32, frame.to_rgb8(&background))
            .ok_or("Frame does not match image size")?;

        let path = cfg.frame_path(index);
        image.save(&path)?;
        info!(
            "Frame {}/{} from {:?} saved to {}",
            index + 1,
            cfg.frames,
            camera.position(),
            path.display()
        );
    }

    Ok(())
}

pub fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = get_command().get_matches();

    let cfg = match Config::from_args(args) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    info!("Rendering {}", cfg.volume_path.display());

    if let Err(e) = render(&cfg) {
        error!("{e}");
        std::process::exit(1);
    }
}
