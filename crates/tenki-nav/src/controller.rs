//! Focus ring state machine.
//!
//! The controller keeps three pieces of state: the navigation mode, the
//! ordered set of focusable targets for that mode, and the focused index.
//! Every operation is total. An empty focus set is a valid state and turns
//! movement and activation into silent no-ops.

use crate::keys::NavCommand;
use crate::surface::{FocusSurface, NavigationMode};

/// Ordered, duplicate-free list of currently interactable targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSet<T> {
    targets: Vec<T>,
}

impl<T: Copy + Eq> FocusSet<T> {
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Build the set for `mode` from what the surface declares.
    ///
    /// Keeps declaration order, drops repeats after the first occurrence and
    /// drops targets the surface reports as not interactable.
    pub fn collect<S>(surface: &S, mode: NavigationMode) -> Self
    where
        S: FocusSurface<Target = T>,
    {
        let mut targets: Vec<T> = Vec::new();
        for target in surface.targets(mode) {
            if targets.contains(&target) || !surface.is_interactable(target) {
                continue;
            }
            targets.push(target);
        }
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.targets.get(index).copied()
    }

    pub fn position(&self, target: T) -> Option<usize> {
        self.targets.iter().position(|t| *t == target)
    }

    pub fn contains(&self, target: T) -> bool {
        self.position(target).is_some()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.targets
    }

    /// Clamp `index` into `[0, len - 1]`. `None` when the set is empty.
    fn clamp(&self, index: usize) -> Option<usize> {
        if self.targets.is_empty() {
            None
        } else {
            Some(index.min(self.targets.len() - 1))
        }
    }
}

impl<T: Copy + Eq> Default for FocusSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Directional focus navigation over a [`FocusSurface`].
///
/// The surface is passed into every call rather than stored, so the same
/// controller drives a terminal screen in the binary and a fake surface in
/// tests.
#[derive(Debug, Clone)]
pub struct FocusController<T> {
    mode: NavigationMode,
    set: FocusSet<T>,
    index: usize,
}

impl<T: Copy + Eq + std::fmt::Debug> FocusController<T> {
    pub fn new() -> Self {
        Self {
            mode: NavigationMode::Normal,
            set: FocusSet::empty(),
            index: 0,
        }
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn focus_set(&self) -> &FocusSet<T> {
        &self.set
    }

    /// Focused index, absent when nothing is focusable.
    pub fn focus_index(&self) -> Option<usize> {
        if self.set.is_empty() {
            None
        } else {
            Some(self.index)
        }
    }

    /// Currently focused target.
    pub fn current(&self) -> Option<T> {
        self.focus_index().and_then(|i| self.set.get(i))
    }

    pub fn is_focused(&self, target: T) -> bool {
        self.current() == Some(target)
    }

    /// Compute the initial focus ring for the current mode.
    pub fn start<S>(&mut self, surface: &mut S)
    where
        S: FocusSurface<Target = T>,
    {
        self.set_mode(surface, self.mode);
    }

    /// Switch modes, rebuild the focus set and focus its first element.
    ///
    /// The set is replaced wholesale and the index always returns to 0, even
    /// when `mode` equals the current mode.
    pub fn set_mode<S>(&mut self, surface: &mut S, mode: NavigationMode)
    where
        S: FocusSurface<Target = T>,
    {
        tracing::debug!(from = ?self.mode, to = ?mode, "navigation mode change");

        // Drop markers from the outgoing ring before it is replaced.
        for target in self.set.as_slice() {
            surface.clear_focused(*target);
        }

        self.mode = mode;
        self.set = FocusSet::collect(surface, mode);
        self.index = 0;
        self.apply_focus(surface, 0);
    }

    pub fn move_next<S>(&mut self, surface: &mut S)
    where
        S: FocusSurface<Target = T>,
    {
        if self.set.is_empty() {
            return;
        }
        self.apply_focus(surface, self.index.saturating_add(1));
    }

    pub fn move_previous<S>(&mut self, surface: &mut S)
    where
        S: FocusSurface<Target = T>,
    {
        if self.set.is_empty() {
            return;
        }
        self.apply_focus(surface, self.index.saturating_sub(1));
    }

    /// Run the activation action of the focused target.
    pub fn activate_current<S>(&mut self, surface: &mut S) -> Option<S::Action>
    where
        S: FocusSurface<Target = T>,
    {
        let target = self.current()?;
        tracing::debug!(?target, "activate");
        Some(surface.activate(target))
    }

    /// Leave the overlay. Returns `false` (and changes nothing) when the
    /// overlay was not open.
    pub fn close_overlay<S>(&mut self, surface: &mut S) -> bool
    where
        S: FocusSurface<Target = T>,
    {
        if !self.mode.is_overlay() {
            return false;
        }
        self.set_mode(surface, NavigationMode::Normal);
        true
    }

    /// Dispatch one remote-control command.
    pub fn handle<S>(&mut self, surface: &mut S, command: NavCommand) -> Option<S::Action>
    where
        S: FocusSurface<Target = T>,
    {
        match command {
            NavCommand::Previous => {
                self.move_previous(surface);
                None
            }
            NavCommand::Next => {
                self.move_next(surface);
                None
            }
            NavCommand::Activate => self.activate_current(surface),
            NavCommand::Back => {
                self.close_overlay(surface);
                None
            }
        }
    }

    /// Move focus straight to `target` (pointer input).
    ///
    /// Returns `false` when the target is not in the active focus set.
    pub fn focus_target<S>(&mut self, surface: &mut S, target: T) -> bool
    where
        S: FocusSurface<Target = T>,
    {
        match self.set.position(target) {
            Some(index) => {
                self.apply_focus(surface, index);
                true
            }
            None => false,
        }
    }

    /// Rebuild the Normal-mode ring after the surface changed what is
    /// interactable.
    ///
    /// Unlike [`set_mode`](Self::set_mode) this keeps focus where it was: the
    /// focused target stays focused if it is still in the ring, otherwise the
    /// old index is clamped into the new ring. The overlay ring is left alone.
    pub fn refresh_targets<S>(&mut self, surface: &mut S)
    where
        S: FocusSurface<Target = T>,
    {
        if self.mode.is_overlay() {
            return;
        }
        let rebuilt = FocusSet::collect(surface, self.mode);
        if rebuilt == self.set {
            return;
        }

        let previous = self.current();
        for target in self.set.as_slice() {
            surface.clear_focused(*target);
        }
        self.set = rebuilt;

        let index = previous
            .and_then(|target| self.set.position(target))
            .unwrap_or(self.index);
        tracing::debug!(?previous, index, "focus ring rebuilt");
        self.apply_focus(surface, index);
    }

    fn apply_focus<S>(&mut self, surface: &mut S, index: usize)
    where
        S: FocusSurface<Target = T>,
    {
        for target in self.set.as_slice() {
            surface.clear_focused(*target);
        }

        let Some(index) = self.set.clamp(index) else {
            return;
        };
        self.index = index;

        if let Some(target) = self.set.get(index) {
            surface.mark_focused(target);
            surface.take_input_focus(target);
            surface.scroll_into_view(target);
        }
    }
}

impl<T: Copy + Eq + std::fmt::Debug> Default for FocusController<T> {
    fn default() -> Self {
        Self::new()
    }
}
