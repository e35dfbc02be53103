//! Ray setup, marching and whole frame rendering.

mod march;
mod ray_setup;
mod render_front;
mod render_options;
mod renderer;
mod view;

pub use march::{
    classify, composite, march, shade_fragment, step_opacity, MarchResult, MarchSettings,
    ALPHA_THRESHOLD, EXTINCTION_SCALE, STEP_SIZE,
};
pub use ray_setup::setup_ray;
pub use render_front::{RenderThread, RendererFront, RendererMessage, ThreadedRenderer};
pub use render_options::{RenderOptions, RenderOptionsBuilder};
pub use renderer::{proxy_fragment, Frame, Renderer};
pub use view::{IsovalueWindow, ViewMode, ViewParameters, VolumeScale};
