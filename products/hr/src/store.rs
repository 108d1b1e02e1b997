//! The authoritative employee list and its mirror in a durable slot.
//!
//! The store is the only writer. Every successful mutation re-serializes the
//! whole list to [`EMPLOYEES_KEY`]; if that write fails the in-memory list is
//! rolled back so memory and slot never disagree.

use entity::{Employee, EmployeeId, EmployeePatch, NewEmployee};
use platform_db::{DbError, KvSlot};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::seed::seed_employees;

/// Slot key holding the JSON array of employees.
pub const EMPLOYEES_KEY: &str = "employees";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Slot(#[from] DbError),
    #[error("failed to encode employee list: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("an employee with email {0} already exists")]
    DuplicateEmail(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Mints strictly increasing millisecond ids.
#[derive(Clone, Copy, Debug, Default)]
struct IdSequence {
    last: u64,
}

impl IdSequence {
    fn observe(&mut self, employees: &[Employee]) {
        let highest = employees
            .iter()
            .filter_map(|e| e.id.numeric())
            .max()
            .unwrap_or(0);
        self.last = self.last.max(highest);
    }

    fn next(&mut self, now_ms: u64) -> EmployeeId {
        self.last = now_ms.max(self.last.saturating_add(1));
        EmployeeId::new(self.last.to_string())
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

pub struct EmployeeStore<S> {
    slot: S,
    employees: Vec<Employee>,
    ids: IdSequence,
}

/// Entries that are not employee objects are dropped one by one; only a
/// document that is not an array at all yields `None`.
fn decode_list(raw: &str) -> Option<Vec<Employee>> {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "persisted employee list is malformed; reseeding");
            return None;
        }
    };
    let total = entries.len();
    let list: Vec<Employee> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(employee) => Some(employee),
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable employee record");
                None
            }
        })
        .collect();
    info!(count = list.len(), skipped = total - list.len(), "employee list loaded");
    Some(list)
}

impl<S: KvSlot> EmployeeStore<S> {
    /// Load the persisted list, seeding the slot when it is empty or not a
    /// JSON array.
    #[instrument(name = "store.open", skip_all)]
    pub fn open(slot: S) -> StoreResult<Self> {
        let loaded = match slot.read(EMPLOYEES_KEY)? {
            Some(raw) => decode_list(&raw),
            None => {
                info!("no persisted employee list; seeding defaults");
                None
            }
        };

        let mut store = Self {
            slot,
            employees: Vec::new(),
            ids: IdSequence::default(),
        };
        match loaded {
            Some(list) => {
                store.ids.observe(&list);
                store.employees = list;
            }
            None => store.reset()?,
        }
        Ok(store)
    }

    /// Current records in creation order.
    pub fn list(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Case-insensitive email lookup.
    pub fn find_by_email(&self, email: &str) -> Option<&Employee> {
        let wanted = email.trim().to_lowercase();
        self.employees
            .iter()
            .find(|e| e.email.trim().to_lowercase() == wanted)
    }

    /// Append a record under a fresh id. Performs no validation.
    #[instrument(name = "store.add", skip_all)]
    pub fn add(&mut self, data: NewEmployee) -> StoreResult<Employee> {
        let mut id = self.ids.next(now_millis());
        while self.get(id.as_str()).is_some() {
            id = self.ids.next(now_millis());
        }
        let employee = Employee::new(id, data);
        self.employees.push(employee.clone());
        if let Err(err) = self.persist() {
            self.employees.pop();
            return Err(err);
        }
        info!(id = %employee.id, "employee added");
        Ok(employee)
    }

    /// Like [`add`](Self::add) but refuses an email already on file.
    pub fn add_unique(&mut self, data: NewEmployee) -> StoreResult<Employee> {
        if self.find_by_email(&data.email).is_some() {
            return Err(StoreError::DuplicateEmail(data.email.trim().to_string()));
        }
        self.add(data)
    }

    /// Merge `patch` into the record with `id`. Returns `false` when no such
    /// record exists; the list is then left untouched.
    #[instrument(name = "store.update", skip(self, patch))]
    pub fn update(&mut self, id: &str, patch: EmployeePatch) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            debug!("update for unknown employee ignored");
            return Ok(false);
        };
        let previous = self.employees[index].clone();
        patch.apply_to(&mut self.employees[index]);
        if let Err(err) = self.persist() {
            self.employees[index] = previous;
            return Err(err);
        }
        info!("employee updated");
        Ok(true)
    }

    /// Remove the record with `id`, returning whether one was removed. The
    /// list is re-persisted either way.
    #[instrument(name = "store.delete", skip(self))]
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self
            .position(id)
            .map(|index| (index, self.employees.remove(index)));
        if let Err(err) = self.persist() {
            if let Some((index, employee)) = removed {
                self.employees.insert(index, employee);
            }
            return Err(err);
        }
        if removed.is_some() {
            info!("employee deleted");
        } else {
            debug!("delete for unknown employee ignored");
        }
        Ok(removed.is_some())
    }

    /// Replace the list and the slot contents with the seed records.
    #[instrument(name = "store.reset", skip_all)]
    pub fn reset(&mut self) -> StoreResult<()> {
        let seeds = seed_employees();
        let previous = std::mem::replace(&mut self.employees, seeds);
        if let Err(err) = self.persist() {
            self.employees = previous;
            return Err(err);
        }
        self.ids.observe(&self.employees);
        info!(count = self.employees.len(), "employee list seeded");
        Ok(())
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.employees.iter().position(|e| e.id == id)
    }

    fn persist(&mut self) -> StoreResult<()> {
        let encoded = serde_json::to_string(&self.employees)?;
        self.slot.write(EMPLOYEES_KEY, &encoded)?;
        Ok(())
    }
}
