use std::collections::BTreeMap;

use lumen_input::{EventKind, InputEvent};

/// Handle returned by [`EventBus::add_observer`], used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&InputEvent)>;

/// Per-world event dispatch keyed by event kind.
///
/// Observers for one kind are notified in registration order.
#[derive(Default)]
pub struct EventBus {
    observers: BTreeMap<ObserverId, (EventKind, Observer)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(
        &mut self,
        kind: EventKind,
        observer: impl FnMut(&InputEvent) + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, (kind, Box::new(observer)));
        id
    }

    /// Returns false if the observer was already gone.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Notify every observer of `event`'s kind. Returns how many ran.
    pub fn dispatch(&mut self, event: &InputEvent) -> usize {
        let kind = event.kind();
        let mut notified = 0;
        for (observed, observer) in self.observers.values_mut() {
            if *observed == kind {
                observer(event);
                notified += 1;
            }
        }
        notified
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
