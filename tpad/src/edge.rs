use crate::registry::{ButtonId, Location};

/// Result of one poll for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
    /// Nothing happened to the button.
    None,
    /// The button was just touched.
    Down(ButtonId),
    /// The button was just released.
    Up(ButtonId),
}

impl TouchEdge {
    /// Signed edge code: `1` for a touch, `-1` for a release, `0` otherwise.
    pub const fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Down(_) => 1,
            Self::Up(_) => -1,
        }
    }

    pub const fn id(self) -> Option<ButtonId> {
        match self {
            Self::None => None,
            Self::Down(id) | Self::Up(id) => Some(id),
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<TouchEdge> for i32 {
    fn from(edge: TouchEdge) -> Self {
        edge.code()
    }
}

/// An edge together with the electrode it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub location: Location,
    pub edge: TouchEdge,
}

impl ButtonEvent {
    pub const fn id(&self) -> Option<ButtonId> {
        self.edge.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_signed_by_direction() {
        assert_eq!(i32::from(TouchEdge::Down(20)), 1);
        assert_eq!(i32::from(TouchEdge::Up(20)), -1);
        assert_eq!(i32::from(TouchEdge::None), 0);
        assert_eq!(TouchEdge::Up(7).id(), Some(7));
        assert_eq!(TouchEdge::None.id(), None);
        assert!(TouchEdge::None.is_none());
    }
}
