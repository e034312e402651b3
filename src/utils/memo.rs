//! Per-instance memoization of derived values.
//!
//! [`Memoized`] is a lazy slot that lives as a field on the owning value and
//! is filled by the first successful read. [`memoize`] bundles a slot with the
//! computation that fills it.
//!
//! Both are single-threaded: the slots are `!Sync`, so an owner holding one
//! cannot be shared across threads without its own synchronisation.

use std::cell::OnceCell;
use std::convert::Infallible;
use std::fmt;

/// A slot that caches the result of a computation for the lifetime of its
/// owner. It is never invalidated.
pub struct Memoized<T> {
    slot: OnceCell<T>,
}

impl<T> Memoized<T> {
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Peek at the cached value without computing it.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    pub fn is_populated(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Return the cached value, running `compute` if the slot is empty.
    pub fn get_or_init(&self, compute: impl FnOnce() -> T) -> &T {
        match self.get_or_try_init(|| Ok::<T, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_init`](Self::get_or_init) for fallible computations.
    ///
    /// An error is returned as-is and leaves the slot empty, so the next call
    /// runs `compute` again. If `compute` filled the slot itself, the value it
    /// stored is kept and the freshly computed one is dropped.
    pub fn get_or_try_init<E>(&self, compute: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }

        let value = compute()?;
        Ok(self.slot.get_or_init(|| value))
    }
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memoized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => f.debug_tuple("Memoized").field(value).finish(),
            None => f.write_str("Memoized(<empty>)"),
        }
    }
}

/// A computation paired with its own cache slot. Built with [`memoize`].
pub struct Memo<T, F> {
    compute: F,
    slot: Memoized<T>,
}

impl<T, F> Memo<T, F>
where
    F: Fn() -> T,
{
    /// Return the cached result, computing it on first access.
    pub fn get(&self) -> &T {
        self.slot.get_or_init(&self.compute)
    }

    pub fn is_populated(&self) -> bool {
        self.slot.is_populated()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Memo<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("slot", &self.slot).finish()
    }
}

/// Wrap `compute` so that it runs at most once per returned [`Memo`].
pub fn memoize<T, F>(compute: F) -> Memo<T, F>
where
    F: Fn() -> T,
{
    Memo {
        compute,
        slot: Memoized::new(),
    }
}
