//! Values derived by the UI utilities.

pub mod countdown;

pub use countdown::{CountdownState, Remaining};
