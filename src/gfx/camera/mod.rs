pub mod orbit_view;

pub use orbit_view::{OrbitView, OrbitViewBounds, OPENGL_TO_WGPU_MATRIX};
