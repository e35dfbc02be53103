use std::error::Error;

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

mod args;
mod config;
mod file;
mod generators;
mod header;

use crate::{
    args::get_command,
    config::Config,
    file::write_file,
    generators::{generate_samples, get_sample_generator},
    header::generate_header,
};

fn generate_vol(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let generator = get_sample_generator(cfg);

    let progress = ProgressBar::new(cfg.dims.z as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} slices"),
    );
    let samples = generate_samples(generator.as_ref(), cfg, &progress);
    progress.finish_and_clear();

    std::fs::create_dir_all(&cfg.output_dir)?;

    let raw_path = cfg.raw_path();
    write_file(&raw_path, &samples)?;
    info!("Samples written to {}", raw_path.display());

    if cfg.nhdr {
        let header = generate_header(cfg, &cfg.raw_file_name());
        let nhdr_path = cfg.nhdr_path();
        write_file(&nhdr_path, header.as_bytes())?;
        info!("Header written to {}", nhdr_path.display());
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

    info!("Generating volume {:?}", cfg);

    if let Err(e) = generate_vol(&cfg) {
        error!("{e}");
        std::process::exit(1);
    }
}
