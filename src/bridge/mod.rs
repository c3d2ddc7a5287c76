//! VM-facing bridge components.
//!
//! This module contains the adapter half of the crate:
//!
//! - **handler**: the abstract output contract plus `PrintOptions` and
//!   the VM handle carrying the exit signal
//! - **output**: the concrete bridge delegating into the active session
//! - **progress**: the timer-vs-signal progress bar driver

pub mod handler;
pub mod output;
pub mod progress;

pub use handler::{OutputHandler, PrintOptions, VmHandle};
pub use output::OutputBridge;
