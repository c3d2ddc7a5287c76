//! Text transformation and host rendering.
//!
//! - **markup**: inline markup tags to ANSI-styled plain text
//! - **keymapper**: raw captured key strings to structured key events
//! - **renderer**: crossterm-backed console surface for the demo binary

pub mod keymapper;
pub mod markup;
pub mod renderer;

pub use keymapper::{map_raw_key, KeyCode, KeyEvent, Modifiers};
pub use renderer::ConsoleSurface;
