pub use criterion::Criterion;

pub use nalgebra::{point, Point3};
pub use raymarch_lib::{
    camera::PerspectiveCamera,
    render::{RenderOptions, Renderer, ViewParameters},
    test_helpers,
    transfer_function::{premade, TransferLut},
    volumetric::Volume,
};

pub const RESOLUTION: (usize, usize) = (256, 256);

pub const DEFAULT_CAMERA_POSITIONS: [Point3<f32>; 3] = [
    point![0.5, 0.5, -2.0],
    point![2.0, 1.5, 2.0],
    point![-1.0, 2.0, -1.0],
];

/// Which view mode a benchmark renders with
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    Isovalue,
    TransferFunction,
}

pub struct BenchOptions {
    pub render_options: RenderOptions,
    pub mode: Mode,
    pub camera_positions: &'static [Point3<f32>],
    pub volume: Volume,
}

impl BenchOptions {
    pub fn new(
        render_options: RenderOptions,
        mode: Mode,
        camera_positions: &'static [Point3<f32>],
        volume: Volume,
    ) -> Self {
        Self {
            render_options,
            mode,
            camera_positions,
            volume,
        }
    }

    pub fn get_benchmark(self) -> impl FnOnce(&mut Criterion) {
        move |c: &mut Criterion| {
            let renderer = Renderer::new(self.render_options).unwrap();
            let (view, lut) = match self.mode {
                Mode::Isovalue => (test_helpers::red_isovalue_view(), TransferLut::default()),
                Mode::TransferFunction => {
                    (ViewParameters::transfer_function(), premade::grayscale().bake())
                }
            };

            let cameras: Vec<_> = self
                .camera_positions
                .iter()
                .map(|&pos| {
                    let mut camera = PerspectiveCamera::look_at(pos, point![0.5, 0.5, 0.5]);
                    let (w, h) = self.render_options.resolution;
                    camera.change_aspect_from_resolution(w, h);
                    camera
                })
                .collect();

            let name = format!(
                "{:?} {}x{} ert={}",
                self.mode,
                self.render_options.resolution.0,
                self.render_options.resolution.1,
                self.render_options.march.early_termination
            );

            c.bench_function(&name, |b| {
                b.iter(|| {
                    for camera in &cameras {
                        let frame = renderer.render(camera, &self.volume, &lut, &view);
                        criterion::black_box(frame);
                    }
                })
            });
        }
    }
}
