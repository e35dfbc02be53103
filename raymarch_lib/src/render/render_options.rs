use super::MarchSettings;
use crate::error::RenderError;

/// Settings of a whole frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// `(width, height)` in pixels
    pub resolution: (usize, usize),
    pub march: MarchSettings,
    /// Skip pixels outside the projected volume bounds
    pub bound_culling: bool,
}

impl RenderOptions {
    pub fn new(resolution: (usize, usize), march: MarchSettings) -> RenderOptions {
        RenderOptions {
            resolution,
            march,
            bound_culling: true,
        }
    }

    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let (width, height) = self.resolution;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution(width, height));
        }
        self.march.validate()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::new((512, 512), MarchSettings::default())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution(&mut self, resolution: (usize, usize)) -> &mut Self {
        self.options.resolution = resolution;
        self
    }

    pub fn early_ray_termination(&mut self, enable: bool) -> &mut Self {
        self.options.march.early_termination = enable;
        self
    }

    pub fn step_size(&mut self, step_size: f32) -> &mut Self {
        self.options.march.step_size = step_size;
        self
    }

    pub fn alpha_threshold(&mut self, threshold: f32) -> &mut Self {
        self.options.march.alpha_threshold = threshold;
        self
    }

    pub fn extinction_scale(&mut self, scale: f32) -> &mut Self {
        self.options.march.extinction_scale = scale;
        self
    }

    pub fn bound_culling(&mut self, enable: bool) -> &mut Self {
        self.options.bound_culling = enable;
        self
    }

    pub fn build(&self) -> Result<RenderOptions, RenderError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Skips validation
    pub fn build_unchecked(&self) -> RenderOptions {
        self.options
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn builder_sets_fields() {
        let options = RenderOptions::builder()
            .resolution((64, 32))
            .early_ray_termination(false)
            .step_size(0.01)
            .build()
            .unwrap();

        assert_eq!(options.resolution, (64, 32));
        assert!(!options.march.early_termination);
        assert_eq!(options.march.step_size, 0.01);
        assert!(options.bound_culling);
    }

    #[test]
    fn build_validates() {
        let res = RenderOptions::builder().resolution((0, 10)).build();
        assert_eq!(res, Err(RenderError::InvalidResolution(0, 10)));

        let res = RenderOptions::builder().step_size(-1.0).build();
        assert_eq!(res, Err(RenderError::InvalidStepSize(-1.0)));

        let unchecked = RenderOptions::builder().step_size(-1.0).build_unchecked();
        assert_eq!(unchecked.march.step_size, -1.0);
    }
}
