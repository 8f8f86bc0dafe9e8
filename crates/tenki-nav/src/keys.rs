//! Remote-control buttons and what they mean to the focus ring.

/// A button on the remote (or its keyboard equivalent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
}

/// Focus ring command derived from a [`NavKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    Previous,
    Next,
    Activate,
    Back,
}

impl From<NavKey> for NavCommand {
    /// The ring is one-dimensional, so Up and Left both go back one step and
    /// Down and Right both go forward one step.
    fn from(key: NavKey) -> Self {
        match key {
            NavKey::Up | NavKey::Left => NavCommand::Previous,
            NavKey::Down | NavKey::Right => NavCommand::Next,
            NavKey::Select => NavCommand::Activate,
            NavKey::Back => NavCommand::Back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_collapse_to_previous_and_next() {
        assert_eq!(NavCommand::from(NavKey::Up), NavCommand::Previous);
        assert_eq!(NavCommand::from(NavKey::Left), NavCommand::Previous);
        assert_eq!(NavCommand::from(NavKey::Down), NavCommand::Next);
        assert_eq!(NavCommand::from(NavKey::Right), NavCommand::Next);
    }

    #[test]
    fn test_select_and_back() {
        assert_eq!(NavCommand::from(NavKey::Select), NavCommand::Activate);
        assert_eq!(NavCommand::from(NavKey::Back), NavCommand::Back);
    }
}
