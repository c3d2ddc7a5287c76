//! VM-facing output contract
//!
//! The abstract handler interface a VM calls against, plus the small
//! value types crossing that boundary. Hosts implement [`OutputHandler`]
//! (the crate ships [`OutputBridge`](super::output::OutputBridge)); the
//! VM side is represented by the opaque [`VmHandle`], which carries the
//! one-shot exit signal the progress driver races against.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::session::SessionError;
use crate::ui::keymapper::KeyEvent;

/// Options for a single print call.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    /// Terminate the written line, or leave it open for in-place
    /// continuation.
    pub append_new_line: bool,
    /// Overwrite the most recent line instead of appending.
    pub replace: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            append_new_line: true,
            replace: false,
        }
    }
}

/// Handle to the executing VM process, treated as an opaque collaborator.
///
/// The only capability the bridge consumes is the exit signal: a one-shot
/// completion event that can be subscribed to (clone the token, await
/// `cancelled()`) and unsubscribed from before it fires (drop the future).
#[derive(Debug, Clone, Default)]
pub struct VmHandle {
    exit: CancellationToken,
}

impl VmHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the exit signal.
    pub fn exit_signal(&self) -> CancellationToken {
        self.exit.clone()
    }

    /// Fire the exit signal. Idempotent; late subscribers still observe it.
    pub fn signal_exit(&self) {
        self.exit.cancel();
    }
}

/// The five operations a VM issues against its console.
///
/// Any terminal-capable host can implement this; no subclassing
/// hierarchy, just the capability surface.
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Render `message` (markup-transformed) per `options`. Never suspends.
    fn print(&self, vm: &VmHandle, message: &str, options: PrintOptions);

    /// Empty the visible buffer. Never suspends.
    fn clear(&self, vm: &VmHandle);

    /// Animate a bounded-wait progress bar; resolves on timeout or on the
    /// VM's exit signal, whichever fires first.
    async fn progress(&self, vm: &VmHandle, timeout_ms: i64);

    /// Print `prompt` on an open line, then suspend until one line of
    /// input is submitted. Password input is never echoed.
    async fn wait_for_input(
        &self,
        vm: &VmHandle,
        is_password: bool,
        prompt: &str,
    ) -> Result<String, SessionError>;

    /// Print `prompt` on an open line, then suspend until one key is
    /// captured; the raw capture is mapped to a structured [`KeyEvent`].
    async fn wait_for_key_press(
        &self,
        vm: &VmHandle,
        prompt: &str,
    ) -> Result<KeyEvent, SessionError>;
}
