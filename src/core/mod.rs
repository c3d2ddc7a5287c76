//! Core session components.
//!
//! This module contains the state-carrying half of the bridge:
//!
//! - **surface**: render primitives a terminal-capable host implements
//! - **session**: the active surface, its line buffer, pending requests
//! - **registry**: the process-wide active-session slot
//!
//! # Architecture
//!
//! ```text
//! SessionRegistry (weak slot)
//! └── TerminalSession
//!     ├── Arc<dyn TerminalSurface>  (host render primitives)
//!     └── SessionState (lines + open-line flag + pending request)
//! ```

pub mod registry;
pub mod session;
pub mod surface;

pub use registry::SessionRegistry;
pub use session::{PendingKind, SessionError, TerminalSession};
pub use surface::TerminalSurface;
