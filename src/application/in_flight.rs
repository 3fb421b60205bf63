use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Per-action busy flags.
///
/// Each network-backed action holds a slot while its request is outstanding;
/// a second trigger of the same action is rejected rather than queued. Clones
/// share the same underlying state so UI layers can observe busy actions.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    active: Arc<Mutex<HashSet<&'static str>>>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `action`. Returns `None` if the action is already
    /// in flight; the returned guard releases the slot on drop, including
    /// when the request future is abandoned.
    pub fn try_begin(&self, action: &'static str) -> Option<ActionGuard> {
        let mut active = self.active.lock().ok()?;
        if active.insert(action) {
            Some(ActionGuard {
                gate: self.clone(),
                action,
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self, action: &'static str) -> bool {
        self.active
            .lock()
            .map(|active| active.contains(action))
            .unwrap_or(false)
    }
}

#[derive(Debug)]
pub struct ActionGuard {
    gate: ActionGate,
    action: &'static str,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        if let Ok(mut active) = self.gate.active.lock() {
            active.remove(self.action);
        }
    }
}
