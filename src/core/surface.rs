//! Terminal surface abstraction
//!
//! The render primitives a host must provide for a session to draw on.
//! The demo binary implements this with crossterm; tests implement it
//! with an in-memory recording fake.

/// Render primitives for one interactive terminal surface.
///
/// All methods are fire-and-forget: the session keeps the authoritative
/// line buffer, the surface only mirrors it for the user. Implementations
/// must tolerate calls after `close` (they become no-ops).
pub trait TerminalSurface: Send + Sync {
    /// Append a new line to the bottom of the surface.
    fn append_line(&self, text: &str);

    /// Rewrite the most recently appended line in place.
    fn rewrite_last(&self, text: &str);

    /// Erase all visible content.
    fn clear(&self);

    /// Bring the surface to the front / give it input focus.
    fn focus(&self);

    /// Tear the surface down. Further render calls are ignored.
    fn close(&self);
}
