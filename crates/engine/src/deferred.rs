use std::cell::RefCell;
use std::rc::Rc;

type Deferred = Box<dyn FnOnce()>;

/// Callbacks to run once the current cycle has rendered.
///
/// Clones share one queue, so simulations, observers and hooks can hold a
/// handle and defer work from anywhere on the cycle thread.
///
/// [`drain`](Self::drain) runs a snapshot: callbacks deferred while draining
/// land in the next drain, never the current one.
#[derive(Clone, Default)]
pub struct DeferredQueue {
    pending: Rc<RefCell<Vec<Deferred>>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the tail of the queue.
    pub fn defer(&self, callback: impl FnOnce() + 'static) {
        self.pending.borrow_mut().push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run every queued callback once, in insertion order, and leave the
    /// queue empty of them. Returns how many ran.
    pub fn drain(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order_exactly_once() {
        let queue = DeferredQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for n in 0..5 {
            let log = Rc::clone(&log);
            queue.defer(move || log.borrow_mut().push(n));
        }
        assert_eq!(queue.len(), 5);

        assert_eq!(queue.drain(), 5);
        assert!(queue.is_empty());
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);

        assert_eq!(queue.drain(), 0);
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn deferred_during_drain_runs_next_drain() {
        let queue = DeferredQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let inner_queue = queue.clone();
            let log = Rc::clone(&log);
            queue.defer(move || {
                log.borrow_mut().push("outer");
                let log = Rc::clone(&log);
                inner_queue.defer(move || log.borrow_mut().push("inner"));
            });
        }

        assert_eq!(queue.drain(), 1);
        assert_eq!(*log.borrow(), vec!["outer"]);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.drain(), 1);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clones_share_the_queue() {
        let queue = DeferredQueue::new();
        let handle = queue.clone();
        handle.defer(|| {});
        assert_eq!(queue.len(), 1);
        queue.drain();
        assert!(handle.is_empty());
    }
}
