//! Focus navigation for remote-control style input.
//!
//! A remote has four directions, a select button and a back button. This crate
//! turns those into focus movement over a one-dimensional focus ring whose
//! members are provided by a [`FocusSurface`].

pub mod controller;
pub mod keys;
pub mod surface;

pub use controller::{FocusController, FocusSet};
pub use keys::{NavCommand, NavKey};
pub use surface::{FocusSurface, NavigationMode};
