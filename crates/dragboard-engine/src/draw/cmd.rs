use super::shapes::{CircleCmd, RectCmd, TextCmd};

/// Renderer-agnostic draw command stream.
///
/// Extending the stream:
/// - add a new shape module under `draw::shapes::*`
/// - add a new variant here and in [`DrawKind`]
/// - implement push helpers inside that shape module
/// - add a matching renderer under `render::shapes::*` and route it in `render::FrameRenderer`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
}

/// Which renderer consumes a command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawKind {
    Rect,
    Circle,
    Text,
}

impl DrawCmd {
    #[inline]
    pub fn kind(&self) -> DrawKind {
        match self {
            DrawCmd::Rect(_) => DrawKind::Rect,
            DrawCmd::Circle(_) => DrawKind::Circle,
            DrawCmd::Text(_) => DrawKind::Text,
        }
    }
}
