// The uniqueness authority for one batch run.
//
// Every address in the final batch must be distinct, and this set is the
// single source of truth for that. `claim` is check-and-insert in one call,
// so two records can never both observe the same candidate as free. The
// registry is owned `&mut` by the assignment loop; sharing one registry
// across concurrently processed batches would need a mutex around it.

use std::collections::HashSet;

use crate::errors::RosterError;

/// Set of addresses already handed out in this batch. Lives exactly as
/// long as one pipeline run.
#[derive(Debug, Default)]
pub struct EmailRegistry {
    assigned: HashSet<String>,
}

impl EmailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-insert in a single step. Returns true when the address was
    /// free and is now reserved for the caller.
    pub fn claim(&mut self, email: &str) -> bool {
        self.assigned.insert(email.to_string())
    }

    /// Pre-register an address that must not already be present (e.g. an
    /// externally reserved alias). A duplicate here means two callers both
    /// believed they owned the address — a programming bug, not input data.
    pub fn reserve(&mut self, email: &str) -> Result<(), RosterError> {
        if !self.assigned.insert(email.to_string()) {
            return Err(RosterError::RegistryConflict {
                email: email.to_string(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, email: &str) -> bool {
        self.assigned.contains(email)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
