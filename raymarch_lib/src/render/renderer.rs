use std::time::Instant;

use log::debug;
use nalgebra::Point3;
use rayon::prelude::*;

use super::{shade_fragment, RenderOptions, ViewParameters};
use crate::{
    camera::Camera,
    color::{self, RGB, RGBA},
    common::{BoundBox, Ray, ViewportBox},
    error::RenderError,
    transfer_function::TransferLut,
    volumetric::Volume,
};

/// Result of one render.
/// Discarded pixels are `None`, others hold straight alpha colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Option<RGBA>>,
}

impl Frame {
    /// Frame with every pixel discarded
    pub fn new(width: usize, height: usize) -> Frame {
        Frame {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row major, first row is the top of the image
    pub fn pixels(&self) -> &[Option<RGBA>] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<RGBA> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    /// Number of pixels that were not discarded
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// Blend every pixel over `background`, 3 bytes per pixel.
    pub fn to_rgb8(&self, background: &RGB) -> Vec<u8> {
        let mut buffer = vec![0; self.pixels.len() * 3];
        self.write_rgb8(background, &mut buffer);
        buffer
    }

    /// Like [`Frame::to_rgb8`], writes into existing buffer.
    /// Extra pixels of a larger buffer are left untouched.
    pub fn write_rgb8(&self, background: &RGB, buffer: &mut [u8]) {
        for (pixel, out) in self.pixels.iter().zip(buffer.chunks_exact_mut(3)) {
            let rgb = match pixel {
                Some(src) => color::blend_over(src, background),
                None => *background,
            };
            out.copy_from_slice(&color::to_bytes(&rgb));
        }
    }
}

/// Point where the camera ray first touches the proxy cube `<0;1>^3`.
///
/// From inside the cube the back face is used, front faces are behind the camera.
pub fn proxy_fragment(ray: &Ray) -> Option<Point3<f32>> {
    let (t_enter, t_exit) = BoundBox::unit().slab_interval(ray);
    if t_enter.is_nan() || t_exit.is_nan() || t_enter > t_exit || t_exit <= 0.0 {
        return None;
    }
    let t = if t_enter >= 0.0 { t_enter } else { t_exit };
    Some(ray.point_from_t(t))
}

/// Renders whole frames, rows are distributed between rayon workers
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Result<Renderer, RenderError> {
        options.validate()?;
        Ok(Renderer { options })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn set_resolution(&mut self, resolution: (usize, usize)) -> Result<(), RenderError> {
        let options = RenderOptions {
            resolution,
            ..self.options
        };
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn render<C>(
        &self,
        camera: &C,
        volume: &Volume,
        lut: &TransferLut,
        view: &ViewParameters,
    ) -> Frame
    where
        C: Camera + Sync,
    {
        self.render_with_progress(camera, volume, lut, view, || ())
    }

    /// `on_row` gets called from worker threads after each finished row
    pub fn render_with_progress<C, F>(
        &self,
        camera: &C,
        volume: &Volume,
        lut: &TransferLut,
        view: &ViewParameters,
        on_row: F,
    ) -> Frame
    where
        C: Camera + Sync,
        F: Fn() + Sync,
    {
        let start = Instant::now();
        let (width, height) = self.options.resolution;
        let mut frame = Frame::new(width, height);

        // every pixel sees the same camera position
        let view = view.with_camera(camera.position());
        let march = &self.options.march;

        let viewport = if self.options.bound_culling {
            camera
                .project_box(BoundBox::unit())
                .unwrap_or_else(ViewportBox::full)
        } else {
            ViewportBox::full()
        };
        let (x_range, y_range) = viewport.get_pixel_range((width, height));

        let step_x = 1.0 / width as f32;
        let step_y = 1.0 / height as f32;

        frame
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                if y_range.contains(&y) {
                    let pixel_y = (y as f32 + 0.5) * step_y;
                    for x in x_range.clone() {
                        let pixel_x = (x as f32 + 0.5) * step_x;
                        let ray = camera.get_ray((pixel_x, pixel_y));
                        row[x] = proxy_fragment(&ray)
                            .and_then(|frag| shade_fragment(&frag, volume, lut, &view, march));
                    }
                }
                on_row();
            });

        debug!(
            "Rendered {}x{} frame in {:?}, {} pixels covered",
            width,
            height,
            start.elapsed(),
            frame.coverage()
        );

        frame
    }

    /// Render and blend over `background` into a RGB byte buffer.
    pub fn render_to_buffer<C>(
        &self,
        camera: &C,
        volume: &Volume,
        lut: &TransferLut,
        view: &ViewParameters,
        background: &RGB,
        buffer: &mut [u8],
    ) where
        C: Camera + Sync,
    {
        let frame = self.render(camera, volume, lut, view);
        frame.write_rgb8(background, buffer);
    }
}

#[cfg(test)]
mod test {

    use nalgebra::{point, vector};

    use super::*;
    use crate::{
        camera::PerspectiveCamera,
        render::{IsovalueWindow, MarchSettings, VolumeScale},
        volumetric::DensityField,
    };

    fn options(width: usize, height: usize) -> RenderOptions {
        RenderOptions::builder()
            .resolution((width, height))
            .step_size(0.001)
            .build()
            .unwrap()
    }

    fn camera(width: usize, height: usize) -> PerspectiveCamera {
        let mut camera =
            PerspectiveCamera::new(point![0.5, 0.5, -2.0], vector![0.0, 0.0, 1.0]);
        camera.change_aspect_from_resolution(width, height);
        camera
    }

    fn uniform_volume() -> Volume {
        Volume::from_field(DensityField::uniform([8, 8, 8], 0.5), VolumeScale::uniform())
    }

    fn red_view() -> ViewParameters {
        ViewParameters::isovalue(IsovalueWindow::new(0.2, 0.8).unwrap(), vector![1.0, 0.0, 0.0])
    }

    #[test]
    fn proxy_fragment_front_face() {
        let ray = Ray::new(point![0.5, 0.5, -2.0], vector![0.0, 0.0, 1.0]);
        let frag = proxy_fragment(&ray).unwrap();
        assert!((frag - point![0.5, 0.5, 0.0]).norm() < 1e-6);
    }

    #[test]
    fn proxy_fragment_from_inside() {
        let ray = Ray::new(point![0.5, 0.5, 0.5], vector![0.0, 0.0, 1.0]);
        let frag = proxy_fragment(&ray).unwrap();
        assert!((frag - point![0.5, 0.5, 1.0]).norm() < 1e-6);
    }

    #[test]
    fn proxy_fragment_miss() {
        let ray = Ray::new(point![0.5, 0.5, -2.0], vector![0.0, 0.0, -1.0]);
        assert!(proxy_fragment(&ray).is_none());

        let ray = Ray::new(point![3.0, 0.5, -2.0], vector![0.0, 0.0, 1.0]);
        assert!(proxy_fragment(&ray).is_none());
    }

    #[test]
    fn invalid_options_rejected() {
        let options = RenderOptions::builder()
            .resolution((0, 0))
            .build_unchecked();
        assert!(Renderer::new(options).is_err());

        let mut renderer = Renderer::new(options_default()).unwrap();
        assert!(renderer.set_resolution((10, 0)).is_err());
        assert_eq!(renderer.options().resolution, (512, 512));
        assert!(renderer.set_resolution((10, 20)).is_ok());
    }

    fn options_default() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn center_pixel_is_red() {
        let (w, h) = (16, 16);
        let renderer = Renderer::new(options(w, h)).unwrap();

        let frame = renderer.render(
            &camera(w, h),
            &uniform_volume(),
            &TransferLut::default(),
            &red_view(),
        );

        assert_eq!(frame.width(), w);
        assert_eq!(frame.height(), h);
        let center = frame.get(8, 8).expect("center pixel hits the volume");
        assert!(center.w > 0.9);
        assert!(center.x > 0.9);
        assert_eq!(center.y, 0.0);

        // corners look past the cube
        assert!(frame.get(0, 0).is_none());
        assert!(frame.get(w - 1, h - 1).is_none());
        assert!(frame.get(w, 0).is_none());
    }

    #[test]
    fn culling_does_not_change_image() {
        let (w, h) = (12, 10);
        let volume = uniform_volume();
        let lut = TransferLut::default();
        let camera = camera(w, h);

        let culled = Renderer::new(options(w, h)).unwrap();
        let mut full_options = options(w, h);
        full_options.bound_culling = false;
        let full = Renderer::new(full_options).unwrap();

        let a = culled.render(&camera, &volume, &lut, &red_view());
        let b = full.render(&camera, &volume, &lut, &red_view());
        assert_eq!(a, b);
    }

    #[test]
    fn progress_called_per_row() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (w, h) = (4, 7);
        let renderer = Renderer::new(options(w, h)).unwrap();
        let rows = AtomicUsize::new(0);

        renderer.render_with_progress(
            &camera(w, h),
            &uniform_volume(),
            &TransferLut::default(),
            &red_view(),
            || {
                rows.fetch_add(1, Ordering::Relaxed);
            },
        );

        assert_eq!(rows.load(Ordering::Relaxed), h);
    }

    #[test]
    fn buffer_blends_over_background() {
        let (w, h) = (8, 8);
        let renderer = Renderer::new(options(w, h)).unwrap();
        let mut buffer = vec![0; w * h * 3];

        renderer.render_to_buffer(
            &camera(w, h),
            &uniform_volume(),
            &TransferLut::default(),
            &red_view(),
            &vector![1.0, 1.0, 1.0],
            &mut buffer,
        );

        // missed corner shows white background
        assert_eq!(&buffer[0..3], &[255, 255, 255]);
        // center is red over white
        let i = (4 * w + 4) * 3;
        assert!(buffer[i] > 230);
        assert!(buffer[i + 1] < 30);
    }

    #[test]
    fn empty_frame_rgb() {
        let frame = Frame::new(2, 1);
        assert_eq!(frame.coverage(), 0);
        assert_eq!(frame.to_rgb8(&vector![0.0, 0.0, 0.0]), vec![0; 6]);
    }

    #[test]
    fn march_settings_reach_renderer() {
        let options = RenderOptions::new((2, 2), MarchSettings::default());
        let renderer = Renderer::new(options).unwrap();
        assert_eq!(renderer.options().march.step_size, 0.0001);
    }
}
