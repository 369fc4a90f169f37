//! Draw stream types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands recorded during a frame
//! - provide deterministic paint order (z-index + insertion order)
//! - group consecutive commands of one kind so renderers can batch them
//!   without breaking paint order across kinds
//! - keep shape-specific helpers isolated per shape file under `draw::shapes`

mod cmd;
mod key;
mod list;

pub mod shapes;

pub use cmd::{DrawCmd, DrawKind};
pub use key::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList, DrawRun};
pub use shapes::{Border, CircleCmd, RectCmd, TextCmd};
