//! Paint model shared between the scene and renderers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - CSS-style color strings (`#rrggbb`, named colors)
//!
//! Geometry types remain in `coords`.

pub mod color;
mod parse;

pub use color::Color;
pub use parse::ColorParseError;
