use futures::lock::{Mutex, OwnedMutexGuard};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};

/// One async mutex per employee. Mutations of an employee's leave requests
/// hold the guard for the whole read-check-write sequence.
///
/// Scope is this process only. Idle slots are dropped on the next acquire.
#[derive(Default)]
pub struct EmployeeLocks {
    slots: std::sync::Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, employee_id: u64) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // the map holds the only reference to a slot nobody holds or waits on
            slots.retain(|id, slot| *id == employee_id || Arc::strong_count(slot) > 1);
            slots.entry(employee_id).or_default().clone()
        };
        slot.lock_owned().await
    }
}
