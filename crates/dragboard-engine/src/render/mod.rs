//! GPU rendering subsystem.
//!
//! Renderers consume `draw` streams and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod ctx;
mod frame;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use frame::FrameRenderer;
