//! Dragboard engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the scene layer:
//! the winit window loop, the wgpu device, input translation,
//! the recorded draw stream and the shape renderers that consume it.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod coords;
pub mod draw;
pub mod render;
pub mod paint;
pub mod text;
