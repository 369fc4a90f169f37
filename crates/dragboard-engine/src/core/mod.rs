//! Contracts between the runtime (platform loop) and the layer above it.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
