//! Simulations and the transactional manager that registers them.
//!
//! A world's simulations are only added through a [`Transaction`]. Staged
//! simulations stay invisible until the transaction handle is dropped, at
//! which point they are appended in staging order. Commit runs from `Drop`,
//! so it also happens on `?` early returns and during panic unwinding.
//!
//! ```
//! use lumen_kernel::{PhysicsSimulation, PlayerSimulation, World};
//!
//! let mut world = World::new();
//! {
//!     let mut tx = world.simulations.transact();
//!     tx.add_simulation(PlayerSimulation::default());
//!     tx.add_simulation(PhysicsSimulation::default());
//! }
//! assert_eq!(world.simulations.names(), vec!["player", "physics"]);
//! ```

mod physics;
mod player;

pub use physics::PhysicsSimulation;
pub use player::PlayerSimulation;

use lumen_common::TimeDelta;

use crate::world::World;

/// A simulation step failed. The world's state after a partial update is not
/// trusted, so this ends the cycle.
#[derive(Debug, thiserror::Error)]
#[error("simulation '{simulation}' failed: {reason}")]
pub struct SimulationError {
    pub simulation: &'static str,
    pub reason: String,
}

/// A unit of per-cycle behaviour owned by a world.
pub trait Simulation {
    fn name(&self) -> &'static str;

    /// Advance by `elapsed`. The world is passed in rather than stored so a
    /// simulation can reach the player, input and other world state.
    fn update(&mut self, world: &mut World, elapsed: TimeDelta) -> Result<(), SimulationError>;
}

/// The committed, ordered simulations of one world.
#[derive(Default)]
pub struct SimulationManager {
    active: Vec<Box<dyn Simulation>>,
}

impl SimulationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction. The returned handle borrows the manager mutably,
    /// so a second transaction cannot be opened while it is alive.
    pub fn transact(&mut self) -> Transaction<'_> {
        Transaction {
            manager: self,
            staged: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Names in update order.
    pub fn names(&self) -> Vec<&'static str> {
        self.active.iter().map(|s| s.name()).collect()
    }

    /// Move the committed set out for an update pass.
    pub(crate) fn take_active(&mut self) -> Vec<Box<dyn Simulation>> {
        std::mem::take(&mut self.active)
    }

    /// Put the set back after an update pass. Anything committed while it
    /// was out goes after it.
    pub(crate) fn restore_active(&mut self, mut active: Vec<Box<dyn Simulation>>) {
        active.append(&mut self.active);
        self.active = active;
    }
}

impl std::fmt::Debug for SimulationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Stage-then-commit handle returned by [`SimulationManager::transact`].
pub struct Transaction<'a> {
    manager: &'a mut SimulationManager,
    staged: Vec<Box<dyn Simulation>>,
}

impl Transaction<'_> {
    /// Stage `simulation`. It joins the world when the transaction ends.
    pub fn add_simulation<T: Simulation + 'static>(&mut self, simulation: T) -> &mut Self {
        tracing::trace!(simulation = simulation.name(), "staging simulation");
        self.staged.push(Box::new(simulation));
        self
    }

    pub fn staged(&self) -> usize {
        self.staged.len()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.staged.is_empty() {
            return;
        }
        let count = self.staged.len();
        self.manager.active.append(&mut self.staged);
        tracing::debug!(count, total = self.manager.active.len(), "committed simulations");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records its name into a shared log on every update.
    struct Named {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Simulation for Named {
        fn name(&self) -> &'static str {
            self.name
        }

        fn update(&mut self, _world: &mut World, _elapsed: TimeDelta) -> Result<(), SimulationError> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    fn named(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Named {
        Named {
            name,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn commit_preserves_staging_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        {
            let mut tx = manager.transact();
            tx.add_simulation(named("c", &log))
                .add_simulation(named("a", &log))
                .add_simulation(named("b", &log));
            assert_eq!(tx.staged(), 3);
        }
        assert_eq!(manager.names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn nothing_visible_until_scope_ends() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        let mut tx = manager.transact();
        tx.add_simulation(named("a", &log));
        tx.add_simulation(named("b", &log));
        assert_eq!(tx.staged(), 2);
        drop(tx);
        assert_eq!(manager.len(), 2);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn second_transaction_appends_after_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        manager.transact().add_simulation(named("first", &log));
        manager.transact().add_simulation(named("second", &log));
        assert_eq!(manager.names(), vec!["first", "second"]);
    }

    #[test]
    fn commits_on_early_error_return() {
        fn register(
            manager: &mut SimulationManager,
            log: &Rc<RefCell<Vec<&'static str>>>,
            lookup: Result<(), String>,
        ) -> Result<(), String> {
            let mut tx = manager.transact();
            tx.add_simulation(named("before-error", log));
            lookup?;
            tx.add_simulation(named("never", log));
            Ok(())
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        assert!(register(&mut manager, &log, Err("config missing".into())).is_err());
        assert_eq!(manager.names(), vec!["before-error"]);
    }

    #[test]
    fn commits_during_unwinding() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut tx = manager.transact();
            tx.add_simulation(named("staged", &log));
            panic!("constructor blew up");
        }));
        assert!(result.is_err());
        assert_eq!(manager.names(), vec!["staged"]);
    }

    #[test]
    fn empty_transaction_is_a_no_op() {
        let mut manager = SimulationManager::new();
        drop(manager.transact());
        assert!(manager.is_empty());
    }

    #[test]
    fn restore_appends_late_commits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SimulationManager::new();
        manager.transact().add_simulation(named("a", &log)).add_simulation(named("b", &log));
        let taken = manager.take_active();
        manager.transact().add_simulation(named("late", &log));
        manager.restore_active(taken);
        assert_eq!(manager.names(), vec!["a", "b", "late"]);
    }
}
