//! Volume ray marching.
//!
//! Loads scalar volumes (`.raw`, `.nhdr`), maps density to color either through
//! an isovalue window or a transfer function, and renders them by marching
//! camera rays through the unit cube with front-to-back compositing.

pub mod camera;
pub mod color;
pub mod common;
pub mod error;
pub mod render;
pub mod test_helpers;
pub mod transfer_function;
pub mod volumetric;

pub use camera::{ArcballCamera, Camera, PerspectiveCamera};
pub use error::{RenderError, TransferFunctionError, VolumeError};
pub use render::{Frame, RenderOptions, Renderer, ViewMode, ViewParameters};
pub use transfer_function::{TransferFunction, TransferLut};
pub use volumetric::Volume;
