//! termbridge - Interactive console bridge for a VM process
//!
//! termbridge sits between a running virtual-machine process and a single
//! human-facing terminal surface. The VM emits output (text, inline
//! markup, progress requests) and solicits input (lines, passwords,
//! single key presses); the bridge renders output and converts terminal
//! events back into values the VM can consume.
//!
//! # Components
//!
//! - **Markup transformer**: inline tag mini-language to ANSI-styled text
//! - **Key event mapper**: raw captured key strings to structured events
//! - **Terminal session**: the visible line buffer, the rewritable last
//!   line, and the single outstanding input request
//! - **Output bridge**: the VM-facing facade delegating to the active
//!   session
//! - **Progress driver**: a tick-driven bar racing the VM's exit signal
//!
//! # Control flow
//!
//! ```text
//! VM → OutputBridge → (markup transform) → TerminalSession → surface
//! surface → (raw line / key event) → OutputBridge → (key map) → VM
//! ```
//!
//! # Lifecycle
//!
//! Exactly one session is active process-wide. Constructing an
//! [`OutputBridge`] for a new VM run disposes the previous session and
//! activates a fresh one, so stale input requests from an earlier run can
//! never resolve against the new one. All suspension is cooperative:
//! input waits and the progress driver are futures on a single event
//! loop, print and clear never block.

pub mod bridge;
pub mod config;
pub mod core;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::bridge::{OutputBridge, OutputHandler, PrintOptions, VmHandle};
pub use crate::config::Config;
pub use crate::core::{PendingKind, SessionError, SessionRegistry, TerminalSession, TerminalSurface};
pub use crate::ui::{map_raw_key, ConsoleSurface, KeyCode, KeyEvent, Modifiers};
