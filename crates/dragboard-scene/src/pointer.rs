use dragboard_engine::coords::Vec2;
use dragboard_engine::input::MouseButton;

/// Button that caused a pointer event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerButton {
    /// Usually the left mouse button. Only this one starts drags.
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

impl From<MouseButton> for PointerButton {
    fn from(b: MouseButton) -> Self {
        match b {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            MouseButton::Back => PointerButton::Other(3),
            MouseButton::Forward => PointerButton::Other(4),
            MouseButton::Other(v) => PointerButton::Other(v),
        }
    }
}

/// Pointer event in absolute window coordinates (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub button: PointerButton,
}

impl PointerEvent {
    #[inline]
    pub fn new(x: f32, y: f32, button: PointerButton) -> Self {
        Self { position: Vec2::new(x, y), button }
    }

    #[inline]
    pub fn primary(x: f32, y: f32) -> Self {
        Self::new(x, y, PointerButton::Primary)
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_button_is_primary() {
        assert_eq!(PointerButton::from(MouseButton::Left), PointerButton::Primary);
        assert!(!PointerEvent::new(0.0, 0.0, MouseButton::Right.into()).is_primary());
    }
}
