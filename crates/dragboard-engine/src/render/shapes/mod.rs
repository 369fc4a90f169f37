//! Shape renderers, one per [`crate::draw::DrawKind`].

mod common;

mod circle;
mod rect;
mod text;

pub use circle::CircleRenderer;
pub use rect::RectRenderer;
pub use text::TextRenderer;
