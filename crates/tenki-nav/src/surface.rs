//! The rendering surface seen through the controller's eyes.

use std::fmt::Debug;

/// Which focus ring is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationMode {
    /// Main screen controls.
    #[default]
    Normal,
    /// A modal selection overlay narrows the ring to its own items.
    OverlayOpen,
}

impl NavigationMode {
    pub fn is_overlay(self) -> bool {
        matches!(self, NavigationMode::OverlayOpen)
    }
}

/// Capability interface over the interactive elements of a screen.
///
/// Targets are lightweight identities (`Copy`), not the elements themselves.
/// The controller never owns element state; it asks the surface to mark,
/// clear, focus, scroll and activate by identity.
pub trait FocusSurface {
    /// Identity of one interactive element.
    type Target: Copy + Eq + Debug;

    /// What activating a target produces for the caller to act on.
    type Action;

    /// All targets declared for `mode`, in declaration order.
    ///
    /// May include duplicates or elements that are currently hidden; the
    /// controller filters those out.
    fn targets(&self, mode: NavigationMode) -> Vec<Self::Target>;

    /// Whether the element can take focus right now (visible and enabled).
    fn is_interactable(&self, target: Self::Target) -> bool;

    fn clear_focused(&mut self, target: Self::Target);

    fn mark_focused(&mut self, target: Self::Target);

    fn take_input_focus(&mut self, target: Self::Target);

    /// Bring the element into the visible viewport, moving as little as possible.
    fn scroll_into_view(&mut self, target: Self::Target);

    fn activate(&mut self, target: Self::Target) -> Self::Action;
}
