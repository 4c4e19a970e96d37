use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StorageError;

/// Device-local persistent key-value storage.
///
/// Values are opaque strings; the recency caches store JSON arrays under fixed
/// keys. Every key is a process-wide slot: any holder of the store may read or
/// overwrite it, so callers persist whole collections rather than deltas.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }
}

/// Non-persistent store, used by tests and for throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.values.borrow_mut().remove(key).is_some())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use super::{KeyValueStore, MemoryStore, StorageError};

    /// Wraps a [`MemoryStore`] and fails reads or writes on demand.
    #[derive(Default)]
    pub(crate) struct FlakyStore {
        pub(crate) inner: MemoryStore,
        pub(crate) fail_reads: Cell<bool>,
        pub(crate) fail_writes: Cell<bool>,
        pub(crate) writes: Cell<usize>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.fail_reads.get() {
                return Err(StorageError::Unavailable("read refused".to_string()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Unavailable("write refused".to_string()));
            }
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<bool, StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Unavailable("write refused".to_string()));
            }
            self.writes.set(self.writes.get() + 1);
            self.inner.remove(key)
        }
    }
}
