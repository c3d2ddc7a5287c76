//! Active-session registry
//!
//! Process-wide there is at most one session receiving render calls and
//! able to serve input requests. The registry is an explicit, cloneable
//! handle to that slot so it can be injected (and faked in tests) instead
//! of living in ambient global state.

use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use super::session::TerminalSession;

/// Handle to the single active-session slot.
///
/// The registry holds only a weak back-reference; whoever created the
/// session (normally the output bridge) keeps it alive. Lookup upgrades
/// the weak pointer, so a slot whose session has been dropped reads as
/// empty.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    slot: Arc<Mutex<Weak<TerminalSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active session, if one is alive.
    pub fn active(&self) -> Option<Arc<TerminalSession>> {
        self.slot.lock().unwrap().upgrade()
    }

    /// Install `session` as the active one. Does not dispose the previous
    /// occupant; callers that need supersession semantics go through
    /// [`SessionRegistry::dispose_active`] first (the session constructor
    /// does this).
    pub fn set_active(&self, session: &Arc<TerminalSession>) {
        *self.slot.lock().unwrap() = Arc::downgrade(session);
        debug!("session registry: new active session installed");
    }

    /// Dispose whatever session currently occupies the slot and empty it.
    pub fn dispose_active(&self) {
        let previous = {
            let mut slot = self.slot.lock().unwrap();
            let previous = slot.upgrade();
            *slot = Weak::new();
            previous
        };
        if let Some(session) = previous {
            debug!("session registry: disposing superseded session");
            session.dispose();
        }
    }
}
