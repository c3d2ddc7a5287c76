//! Console surface backed by crossterm
//!
//! Implements the render primitives against the real process console for
//! the demo binary. The session owns the authoritative line buffer; this
//! surface only mirrors it, so render errors are swallowed rather than
//! propagated.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{MoveTo, MoveToPreviousLine},
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use tracing::trace;

use crate::core::surface::TerminalSurface;

/// Crossterm implementation of [`TerminalSurface`].
#[derive(Default)]
pub struct ConsoleSurface {
    closed: AtomicBool,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl TerminalSurface for ConsoleSurface {
    fn append_line(&self, text: &str) {
        if self.is_closed() {
            return;
        }
        let mut out = io::stdout();
        let _ = execute!(out, Print(text), Print("\r\n"));
    }

    fn rewrite_last(&self, text: &str) {
        if self.is_closed() {
            return;
        }
        let mut out = io::stdout();
        let _ = execute!(
            out,
            MoveToPreviousLine(1),
            Clear(ClearType::CurrentLine),
            Print(text),
            Print("\r\n")
        );
    }

    fn clear(&self) {
        if self.is_closed() {
            return;
        }
        let mut out = io::stdout();
        let _ = execute!(out, Clear(ClearType::All), MoveTo(0, 0));
    }

    fn focus(&self) {
        // A real console is already frontmost; nothing to raise.
        trace!("console surface focused");
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = io::stdout().flush();
    }
}
