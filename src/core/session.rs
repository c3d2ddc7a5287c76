//! Terminal session management
//!
//! A [`TerminalSession`] owns one interactive surface: the visible line
//! buffer, the "still open" last line that continuation prints and the
//! progress bar rewrite in place, and the single outstanding input or
//! key-press request. Sessions are created per VM run and superseded, not
//! reused: activating a new session disposes the previous one so stale
//! requests from an old run can never resolve against a new one.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use super::registry::SessionRegistry;
use super::surface::TerminalSurface;

/// Errors raised by session input requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A second line/key request was issued while one was already
    /// outstanding. The first request is unaffected.
    #[error("an input request is already outstanding on this session")]
    ConcurrentRequest,

    /// Only raised in strict-dispose mode: the session was disposed while
    /// the request was outstanding. In the default mode the waiter is
    /// abandoned instead and never resolves.
    #[error("session was disposed while the request was outstanding")]
    Disposed,
}

/// Kind of the outstanding request, exposed so a host input pump knows
/// whether to collect a whole line, suppress echo, or capture one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    None,
    Line { password: bool },
    Key,
}

enum Pending {
    None,
    Line { password: bool, tx: oneshot::Sender<String> },
    Key { tx: oneshot::Sender<String> },
}

struct SessionState {
    /// Rendered lines, append-only except for the most recent one.
    lines: Vec<String>,
    /// Whether the most recent line may still be continued in place.
    last_line_open: bool,
    pending: Pending,
    disposed: bool,
}

/// One interactive terminal surface plus its pending request slot.
pub struct TerminalSession {
    surface: Arc<dyn TerminalSurface>,
    strict_dispose: bool,
    state: Mutex<SessionState>,
}

impl TerminalSession {
    /// Create a session and make it the active one.
    ///
    /// Disposes whatever session currently occupies the registry slot,
    /// installs this one, and gives its surface input focus.
    pub fn activate(
        surface: Arc<dyn TerminalSurface>,
        registry: &SessionRegistry,
        strict_dispose: bool,
    ) -> Arc<Self> {
        registry.dispose_active();

        let session = Arc::new(Self {
            surface,
            strict_dispose,
            state: Mutex::new(SessionState {
                lines: Vec::new(),
                last_line_open: false,
                pending: Pending::None,
                disposed: false,
            }),
        });

        registry.set_active(&session);
        session.surface.focus();
        debug!(strict_dispose, "terminal session activated");
        session
    }

    /// Append `text` as a new line, or continue the currently open line.
    ///
    /// Embedded newlines split into further appended lines. When
    /// `append_new_line` is false the final line is left open so the next
    /// print (or the echoed input) continues it in place.
    pub fn print(&self, text: &str, append_new_line: bool) {
        let mut st = self.state.lock().unwrap();
        if st.disposed {
            return;
        }

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or("");

        if st.last_line_open && !st.lines.is_empty() {
            let last = st.lines.last_mut().unwrap();
            last.push_str(first);
            self.surface.rewrite_last(last);
        } else {
            st.lines.push(first.to_string());
            self.surface.append_line(first);
        }

        for segment in segments {
            st.lines.push(segment.to_string());
            self.surface.append_line(segment);
        }

        st.last_line_open = !append_new_line;
    }

    /// Rewrite the most recent line's contents in place.
    ///
    /// Degenerates to a normal append when no line exists yet.
    pub fn replace_last(&self, text: &str) {
        let mut st = self.state.lock().unwrap();
        if st.disposed {
            return;
        }

        match st.lines.last_mut() {
            Some(last) => {
                *last = text.to_string();
                self.surface.rewrite_last(text);
            }
            None => {
                st.lines.push(text.to_string());
                self.surface.append_line(text);
            }
        }
    }

    /// Empty the visible buffer. Any pending request is untouched.
    pub fn clear(&self) {
        let mut st = self.state.lock().unwrap();
        if st.disposed {
            return;
        }
        st.lines.clear();
        st.last_line_open = false;
        self.surface.clear();
    }

    /// Suspend until the user submits one line of input.
    ///
    /// At most one line/key request may be outstanding; a second request
    /// rejects immediately with [`SessionError::ConcurrentRequest`]. When
    /// `is_password` is set the submitted characters are not echoed into
    /// the visible buffer.
    pub async fn request_line(&self, is_password: bool) -> Result<String, SessionError> {
        // The guard must not live across an await, or the future loses Send.
        let rx = {
            let mut st = self.state.lock().unwrap();
            if st.disposed {
                None
            } else if !matches!(st.pending, Pending::None) {
                return Err(SessionError::ConcurrentRequest);
            } else {
                let (tx, rx) = oneshot::channel();
                st.pending = Pending::Line { password: is_password, tx };
                Some(rx)
            }
        };
        let Some(rx) = rx else {
            return self.disposed_outcome().await;
        };

        match rx.await {
            Ok(line) => Ok(line),
            Err(_) => self.disposed_outcome().await,
        }
    }

    /// Suspend until exactly one key event is captured.
    ///
    /// Resolves with the raw captured key string; mapping to a structured
    /// key event happens at the bridge boundary.
    pub async fn request_key_press(&self) -> Result<String, SessionError> {
        // The guard must not live across an await, or the future loses Send.
        let rx = {
            let mut st = self.state.lock().unwrap();
            if st.disposed {
                None
            } else if !matches!(st.pending, Pending::None) {
                return Err(SessionError::ConcurrentRequest);
            } else {
                let (tx, rx) = oneshot::channel();
                st.pending = Pending::Key { tx };
                Some(rx)
            }
        };
        let Some(rx) = rx else {
            return self.disposed_outcome().await;
        };

        match rx.await {
            Ok(raw) => Ok(raw),
            Err(_) => self.disposed_outcome().await,
        }
    }

    /// Complete an outstanding line request with `line`.
    ///
    /// Echoes the input into the open prompt line (unless the request was
    /// a password) and terminates that line. Returns false when no line
    /// request was outstanding.
    pub fn submit_line(&self, line: &str) -> bool {
        let taken = {
            let mut st = self.state.lock().unwrap();
            match std::mem::replace(&mut st.pending, Pending::None) {
                Pending::Line { password, tx } => Some((password, tx)),
                other => {
                    st.pending = other;
                    None
                }
            }
        };

        let Some((password, tx)) = taken else {
            return false;
        };

        if password {
            self.print("", true);
        } else {
            self.print(line, true);
        }
        let _ = tx.send(line.to_string());
        true
    }

    /// Complete an outstanding key-press request with the raw key string.
    ///
    /// Key captures are never echoed. Returns false when no key request
    /// was outstanding.
    pub fn submit_key(&self, raw: &str) -> bool {
        let taken = {
            let mut st = self.state.lock().unwrap();
            match std::mem::replace(&mut st.pending, Pending::None) {
                Pending::Key { tx } => Some(tx),
                other => {
                    st.pending = other;
                    None
                }
            }
        };

        let Some(tx) = taken else {
            return false;
        };
        let _ = tx.send(raw.to_string());
        true
    }

    /// Kind of the currently outstanding request.
    pub fn pending_kind(&self) -> PendingKind {
        match &self.state.lock().unwrap().pending {
            Pending::None => PendingKind::None,
            Pending::Line { password, .. } => PendingKind::Line {
                password: *password,
            },
            Pending::Key { .. } => PendingKind::Key,
        }
    }

    /// Snapshot of the visible buffer.
    pub fn lines(&self) -> Vec<String> {
        self.state.lock().unwrap().lines.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().unwrap().disposed
    }

    /// Tear down the surface and discard the buffer.
    ///
    /// Any outstanding request is abandoned: its waiter never resolves
    /// (or, in strict-dispose mode, rejects with
    /// [`SessionError::Disposed`]). Idempotent.
    pub fn dispose(&self) {
        {
            let mut st = self.state.lock().unwrap();
            if st.disposed {
                return;
            }
            st.disposed = true;
            // Dropping the sender wakes the waiter, which then parks or
            // rejects depending on the dispose mode.
            st.pending = Pending::None;
            st.lines.clear();
            st.last_line_open = false;
        }
        self.surface.close();
        debug!("terminal session disposed");
    }

    async fn disposed_outcome<T>(&self) -> Result<T, SessionError> {
        if self.strict_dispose {
            Err(SessionError::Disposed)
        } else {
            futures::future::pending().await
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
