use super::{PersistenceResult, RosterStore};
use crate::Roster;
use std::cell::{Cell, RefCell};

/// Keeps the last saved roster in memory. Useful for embedding the manager
/// without a data file and for observing how often it persists.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    roster: RefCell<Option<Roster>>,
    save_count: Cell<usize>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Roster) -> Self {
        Self {
            roster: RefCell::new(Some(roster)),
            save_count: Cell::new(0),
        }
    }

    pub fn saved(&self) -> Option<Roster> {
        self.roster.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl RosterStore for MemoryRosterStore {
    fn load_roster(&self) -> PersistenceResult<Option<Roster>> {
        Ok(self.roster.borrow().clone())
    }

    fn save_roster(&self, roster: &Roster) -> PersistenceResult<()> {
        *self.roster.borrow_mut() = Some(roster.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
