/*!
# Pooled walkers

One reusable walker instance per walker type per thread. `acquire` hands out
the cached instance (or a fresh `Default` one on a miss), `release` resets it
and puts it back. `release` takes the walker by value, so a released walker
cannot be used again. [`Pooled`] releases automatically on drop.

Slots are thread-local: rayon workers never share walker state.
*/

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Walker that can be reused after `reset`.
pub trait PooledWalker: Default + 'static {
    /// Clears all per-use state (collected nodes, flags, target symbol).
    fn reset(&mut self);
}

/// Счётчики пула текущего потока.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub hits: u64,
    pub misses: u64,
    pub releases: u64,
}

thread_local! {
    static SLOTS: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
    static STATS: Cell<PoolStats> = Cell::new(PoolStats::default());
}

fn update_stats(f: impl FnOnce(&mut PoolStats)) {
    STATS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

pub fn acquire<W: PooledWalker>() -> W {
    let cached = SLOTS.with(|slots| slots.borrow_mut().remove(&TypeId::of::<W>()));
    match cached.and_then(|boxed| boxed.downcast::<W>().ok()) {
        Some(walker) => {
            update_stats(|s| s.hits += 1);
            *walker
        }
        None => {
            tracing::trace!(walker = std::any::type_name::<W>(), "walker pool miss");
            update_stats(|s| s.misses += 1);
            W::default()
        }
    }
}

pub fn release<W: PooledWalker>(mut walker: W) {
    walker.reset();
    update_stats(|s| s.releases += 1);
    SLOTS.with(|slots| {
        slots.borrow_mut().insert(TypeId::of::<W>(), Box::new(walker));
    });
}

/// Статистика пула для текущего потока.
pub fn stats() -> PoolStats {
    STATS.with(Cell::get)
}

/// RAII-обёртка: возвращает walker в пул при выходе из области видимости.
pub struct Pooled<W: PooledWalker> {
    walker: W,
}

impl<W: PooledWalker> Pooled<W> {
    pub fn new() -> Self {
        Self { walker: acquire::<W>() }
    }
}

impl<W: PooledWalker> Default for Pooled<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: PooledWalker> Deref for Pooled<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.walker
    }
}

impl<W: PooledWalker> DerefMut for Pooled<W> {
    fn deref_mut(&mut self) -> &mut W {
        &mut self.walker
    }
}

impl<W: PooledWalker> Drop for Pooled<W> {
    fn drop(&mut self) {
        release(std::mem::take(&mut self.walker));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        seen: Vec<u32>,
        marker: u32,
    }

    impl PooledWalker for Counter {
        fn reset(&mut self) {
            self.seen.clear();
        }
    }

    #[test]
    fn reuses_instance_after_release() {
        // отдельный поток: чистая статистика
        std::thread::spawn(|| {
            let mut first = acquire::<Counter>();
            first.seen.push(1);
            first.marker = 42;
            release(first);

            let second = acquire::<Counter>();
            assert!(second.seen.is_empty());
            assert_eq!(second.marker, 42);
            release(second);

            assert_eq!(stats(), PoolStats { hits: 1, misses: 1, releases: 2 });
        })
        .join()
        .unwrap();
    }

    #[test]
    fn guard_releases_on_drop() {
        std::thread::spawn(|| {
            {
                let mut guard = Pooled::<Counter>::new();
                guard.seen.push(7);
            }
            let again = Pooled::<Counter>::new();
            assert!(again.seen.is_empty());
            assert_eq!(stats().hits, 1);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn slots_are_per_thread() {
        release(Counter { seen: Vec::new(), marker: 5 });
        let other = std::thread::spawn(|| acquire::<Counter>().marker).join().unwrap();
        assert_eq!(other, 0);
    }
}
