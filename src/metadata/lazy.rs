//! Compute-once value holder for lazily decoded signatures.
//!
//! A [`LazyDecodeCell`] holds either a materialized value or a pending decode
//! step. The first read runs the step, memoizes the result and discards the
//! step; later reads return the memoized value without touching the backing
//! bytes again. Nested decodes reuse the caller's protection set through
//! [`LazyDecodeCell::get_protected`].
//!
//! Values are handed out as [`Arc`] clones so a reader keeps its view even
//! when the cell is overwritten afterwards. Direct assignment through
//! [`LazyDecodeCell::set`] always replaces the current value, materialized or
//! not. Readers racing on a pending cell each run the step themselves
//! (duplicate work is allowed); the first stored value wins and every reader
//! receives a usable value.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::{metadata::protection::RecursionProtection, Result};

/// A decode step bound to a cell: takes the traversal-token set of the
/// current top-level decode and produces the value from the raw source.
/// Shared rather than consumed, so racing readers can each run it.
type DecodeStep<T> = Arc<dyn Fn(&mut RecursionProtection) -> Result<T> + Send + Sync>;

/// Lazily decoded, memoized value parameterized by a recursion protection set.
///
/// Used everywhere a signature is decoded on demand. A successful decode is
/// memoized and a failed decode is not retried; direct assignment through
/// [`LazyDecodeCell::set`] bypasses decoding entirely and replaces whatever
/// the cell currently holds.
pub struct LazyDecodeCell<T> {
    value: RwLock<Option<Arc<T>>>,
    factory: Mutex<Option<DecodeStep<T>>>,
}

impl<T> LazyDecodeCell<T> {
    /// Creates a cell that already holds `value`, the in-memory construction
    /// path where no bytes are ever read.
    #[must_use]
    pub fn materialized(value: T) -> Self {
        LazyDecodeCell {
            value: RwLock::new(Some(Arc::new(value))),
            factory: Mutex::new(None),
        }
    }

    /// Creates a cell with a pending decode step, the row-backed path.
    pub fn pending<F>(factory: F) -> Self
    where
        F: Fn(&mut RecursionProtection) -> Result<T> + Send + Sync + 'static,
    {
        LazyDecodeCell {
            value: RwLock::new(None),
            factory: Mutex::new(Some(Arc::new(factory))),
        }
    }

    /// True once a value has been materialized, by decode or assignment.
    #[must_use]
    pub fn is_materialized(&self) -> bool {
        self.current().is_some()
    }

    /// Returns the value, running the decode step with a fresh
    /// [`RecursionProtection`] if nothing is materialized yet.
    ///
    /// # Errors
    /// Propagates the decode step's error; a failed decode is not retried.
    pub fn get(&self) -> Result<Arc<T>> {
        let mut protection = RecursionProtection::new();
        self.get_protected(&mut protection)
    }

    /// Returns the value, threading the caller's protection set through the
    /// decode step so nested decodes share one traversal-token set.
    ///
    /// A reader arriving while another thread's decode is in flight runs the
    /// step itself rather than waiting or failing; whichever result is stored
    /// first is the one every reader sees afterwards.
    ///
    /// # Errors
    /// Propagates the decode step's error, or fails when an earlier decode
    /// already failed and consumed the step.
    pub fn get_protected(&self, protection: &mut RecursionProtection) -> Result<Arc<T>> {
        if let Some(value) = self.current() {
            return Ok(value);
        }

        // Clone the step instead of taking it, and release the lock before
        // running: racing readers duplicate the decode, and a nested decode
        // of another cell never waits on this one.
        let step = self
            .factory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let Some(step) = step else {
            return match self.current() {
                Some(value) => Ok(value),
                None => Err(malformed_error!("signature decode previously failed")),
            };
        };

        let result = step(protection);

        // The step is spent either way; a failed decode is not retried.
        self.factory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let value = Arc::new(result?);

        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            // A racing decode or an explicit assignment landed first.
            return Ok(Arc::clone(existing));
        }

        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Assigns the value directly, discarding any pending decode step and
    /// replacing an already materialized value. Assignment always wins;
    /// readers holding an [`Arc`] from before keep their old view.
    pub fn set(&self, value: T) {
        self.factory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(value));
    }

    fn current(&self) -> Option<Arc<T>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LazyDecodeCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.current() {
            Some(value) => f.debug_tuple("LazyDecodeCell").field(&value).finish(),
            None => f.write_str("LazyDecodeCell(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[test]
    fn materialized_never_runs_a_step() {
        let cell = LazyDecodeCell::materialized(42u32);
        assert!(cell.is_materialized());
        assert_eq!(*cell.get().unwrap(), 42);
    }

    #[test]
    fn pending_runs_once_and_memoizes() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let cell = LazyDecodeCell::pending(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(7u32)
        });

        assert!(!cell.is_materialized());
        assert_eq!(*cell.get().unwrap(), 7);
        assert_eq!(*cell.get().unwrap(), 7);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_wins_over_pending_factory() {
        let cell = LazyDecodeCell::pending(|_| Ok(1u32));
        cell.set(2);

        assert_eq!(*cell.get().unwrap(), 2);
    }

    #[test]
    fn set_replaces_a_materialized_value() {
        let cell = LazyDecodeCell::materialized(1u32);
        cell.set(2);
        assert_eq!(*cell.get().unwrap(), 2);

        // Assignment also replaces a decoded value
        let cell = LazyDecodeCell::pending(|_| Ok(10u32));
        assert_eq!(*cell.get().unwrap(), 10);
        cell.set(11);
        assert_eq!(*cell.get().unwrap(), 11);
    }

    #[test]
    fn readers_keep_their_view_across_replacement() {
        let cell = LazyDecodeCell::materialized(1u32);
        let before = cell.get().unwrap();

        cell.set(2);

        assert_eq!(*before, 1);
        assert_eq!(*cell.get().unwrap(), 2);
    }

    #[test]
    fn failed_decode_is_not_retried() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let cell: LazyDecodeCell<u32> = LazyDecodeCell::pending(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(malformed_error!("bad bytes"))
        });

        assert!(cell.get().is_err());
        assert!(cell.get().is_err());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn step_sees_the_callers_protection() {
        use crate::metadata::token::Token;

        let token = Token::new(0x1B000001);
        let cell = LazyDecodeCell::pending(move |protection: &mut RecursionProtection| {
            Ok(protection.contains(token))
        });

        let mut protection = RecursionProtection::new();
        protection.enter(token);
        assert!(*cell.get_protected(&mut protection).unwrap());
    }

    #[test]
    fn racing_readers_all_get_a_value() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let cell = Arc::new(LazyDecodeCell::pending(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(7u32)
        }));

        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    *cell.get().unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 7);
        }

        // Racing decodes may duplicate work but every reader succeeds
        assert!(runs.load(Ordering::SeqCst) >= 1);
        assert_eq!(*cell.get().unwrap(), 7);
    }
}
