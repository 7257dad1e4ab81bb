use parking_lot::{Mutex, MutexGuard};

/// A value that is only reachable under a lock.
///
/// Every store keeps its collection in a `Guarded`, so foreground callers and
/// enrichment workers never observe a half-applied mutation. Reads hand out
/// copies taken under the lock instead of references into the collection.
#[derive(Debug, Default)]
pub struct Guarded<T> {
    inner: Mutex<T>,
}

impl<T> Guarded<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Locks the value for a multi-step critical section.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Runs `f` with exclusive access and returns its result.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.lock())
    }
}

impl<T: Clone> Guarded<T> {
    /// A copy of the current value.
    pub fn snapshot(&self) -> T {
        self.inner.lock().clone()
    }
}
