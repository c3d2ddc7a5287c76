//! Shared test fixtures: an in-memory recording surface and a session
//! factory used by the session, bridge, and progress tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::registry::SessionRegistry;
use crate::core::session::TerminalSession;
use crate::core::surface::TerminalSurface;

/// Surface that records every render call for assertions.
#[derive(Default)]
pub struct RecordingSurface {
    lines: Mutex<Vec<String>>,
    rewrites: AtomicUsize,
    clears: AtomicUsize,
    focuses: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingSurface {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn rewrite_count(&self) -> usize {
        self.rewrites.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn focus_count(&self) -> usize {
        self.focuses.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl TerminalSurface for RecordingSurface {
    fn append_line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn rewrite_last(&self, text: &str) {
        self.rewrites.fetch_add(1, Ordering::SeqCst);
        let mut lines = self.lines.lock().unwrap();
        match lines.last_mut() {
            Some(last) => *last = text.to_string(),
            None => lines.push(text.to_string()),
        }
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.lines.lock().unwrap().clear();
    }

    fn focus(&self) {
        self.focuses.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Fresh session on a recording surface with its own registry.
pub fn test_session(strict_dispose: bool) -> (Arc<TerminalSession>, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::default());
    let registry = SessionRegistry::new();
    let session = TerminalSession::activate(surface.clone(), &registry, strict_dispose);
    (session, surface)
}
