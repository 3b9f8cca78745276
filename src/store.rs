use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::DexError;
use crate::pokemon_fetch::Pokemon;

/// Single-slot holder of the most recently fetched entity.
///
/// Last write wins; the slot is never partially updated. Reads from an empty
/// slot fail with `NoCurrentEntity` instead of handing out stale data.
#[derive(Debug, Default)]
pub struct ResultStore {
    slot: Option<Pokemon>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn set(&mut self, entity: Pokemon) {
        self.slot = Some(entity);
    }

    pub fn get(&self) -> Result<&Pokemon, DexError> {
        self.slot.as_ref().ok_or(DexError::NoCurrentEntity)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

/// The store as shared between concurrently in-flight lookups.
///
/// Every lookup takes a ticket at dispatch; a completion whose ticket is no
/// longer the newest may not overwrite the slot. Without the tickets the slot
/// would be plain last-resolved-write-wins, letting a slow stale lookup
/// clobber a newer result.
#[derive(Debug, Default)]
pub struct SharedStore {
    inner: Mutex<ResultStore>,
    latest_ticket: AtomicU64,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Overwrites the slot unless a newer lookup has been dispatched since
    /// `ticket` was issued. Returns whether the write happened.
    pub fn set_if_current(&self, ticket: u64, entity: Pokemon) -> bool {
        if ticket != self.latest_ticket.load(Ordering::SeqCst) {
            return false;
        }
        self.lock().set(entity);
        true
    }

    pub fn with_current<T>(
        &self,
        read: impl FnOnce(&Pokemon) -> Result<T, DexError>,
    ) -> Result<T, DexError> {
        let guard = self.lock();
        read(guard.get()?)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ResultStore> {
        self.inner.lock().expect("result store lock poisoned")
    }
}
