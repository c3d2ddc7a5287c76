//! Output bridge
//!
//! The concrete [`OutputHandler`] backing a VM run. Adapts VM calls to
//! the active terminal session: output is markup-transformed and
//! newline-unescaped on the way in, raw key captures are mapped to
//! structured events on the way out. Input waits resolve against the
//! registry's current active session rather than the bridge's own
//! captured reference, so a session created after the bridge can still
//! serve them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::handler::{OutputHandler, PrintOptions, VmHandle};
use super::progress;
use crate::core::registry::SessionRegistry;
use crate::core::session::{SessionError, TerminalSession};
use crate::core::surface::TerminalSurface;
use crate::ui::keymapper::{self, KeyEvent};
use crate::ui::markup;

/// VM-facing console bridge bound to one terminal session.
pub struct OutputBridge {
    session: Arc<TerminalSession>,
    registry: SessionRegistry,
    hide_unsupported_tags: bool,
    strict_dispose: bool,
    progress_tick: Duration,
}

impl OutputBridge {
    /// Create a bridge for a new VM run.
    ///
    /// Activating the session disposes whatever session was active
    /// before, enforcing the one-active-session invariant at the point a
    /// new run begins.
    pub fn new(
        surface: Arc<dyn TerminalSurface>,
        registry: SessionRegistry,
        hide_unsupported_tags: bool,
        strict_dispose: bool,
    ) -> Self {
        let session = TerminalSession::activate(surface, &registry, strict_dispose);
        debug!(hide_unsupported_tags, "output bridge constructed");
        Self {
            session,
            registry,
            hide_unsupported_tags,
            strict_dispose,
            progress_tick: progress::DEFAULT_TICK,
        }
    }

    /// Override the progress animation tick interval.
    pub fn with_progress_tick(mut self, tick: Duration) -> Self {
        self.progress_tick = tick;
        self
    }

    /// The session this bridge renders to.
    pub fn session(&self) -> &Arc<TerminalSession> {
        &self.session
    }

    /// Markup transform plus the second unescape pass for literal `\n`
    /// sequences that upstream text still carries.
    fn transform(&self, message: &str) -> String {
        markup::transform(message, self.hide_unsupported_tags).replace("\\n", "\n")
    }

    /// Outcome of an input wait when the registry slot is empty: the same
    /// contract as a request outstanding on a disposed session, since the
    /// only way the slot empties is the active session being disposed or
    /// dropped without a successor.
    async fn missing_session_outcome<T>(&self) -> Result<T, SessionError> {
        warn!("no active session in registry to serve input request");
        if self.strict_dispose {
            Err(SessionError::Disposed)
        } else {
            futures::future::pending().await
        }
    }
}

#[async_trait]
impl OutputHandler for OutputBridge {
    fn print(&self, _vm: &VmHandle, message: &str, options: PrintOptions) {
        let transformed = self.transform(message);

        if options.replace {
            self.session.replace_last(&transformed);
            return;
        }
        self.session.print(&transformed, options.append_new_line);
    }

    fn clear(&self, _vm: &VmHandle) {
        self.session.clear();
    }

    async fn progress(&self, vm: &VmHandle, timeout_ms: i64) {
        progress::run(
            &self.session,
            vm.exit_signal(),
            timeout_ms,
            self.progress_tick,
        )
        .await;
    }

    async fn wait_for_input(
        &self,
        vm: &VmHandle,
        is_password: bool,
        prompt: &str,
    ) -> Result<String, SessionError> {
        // Prompt and input share a line: print with the line left open.
        self.print(
            vm,
            prompt,
            PrintOptions {
                append_new_line: false,
                replace: false,
            },
        );
        let Some(session) = self.registry.active() else {
            return self.missing_session_outcome().await;
        };
        session.request_line(is_password).await
    }

    async fn wait_for_key_press(
        &self,
        vm: &VmHandle,
        prompt: &str,
    ) -> Result<KeyEvent, SessionError> {
        self.print(
            vm,
            prompt,
            PrintOptions {
                append_new_line: false,
                replace: false,
            },
        );
        let Some(session) = self.registry.active() else {
            return self.missing_session_outcome().await;
        };
        let raw = session.request_key_press().await?;
        Ok(keymapper::map_raw_key(&raw))
    }
}
