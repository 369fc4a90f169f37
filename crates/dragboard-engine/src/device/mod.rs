//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue
//! - creates and configures the window surface
//! - acquires frames and hands out encoders/views for rendering

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
