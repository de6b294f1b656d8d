//! Thread-local object pooling helpers.
//!
//! Both engines keep a small per-thread stash of mutable computation
//! state so repeated calls on the same worker reuse allocations. The
//! helpers here factor out the acquire/reset/release pattern shared by
//! `fastdoubling` and `matrix`.

use std::cell::RefCell;

/// Acquire an object from a thread-local pool.
///
/// If the pool has an object, it is popped and `reset` is called on it.
/// Otherwise a new object is created via `factory`.
pub(crate) fn tl_acquire<T>(pool: &RefCell<Vec<T>>, factory: fn() -> T, reset: fn(&mut T)) -> T {
    let mut pool = pool.borrow_mut();
    match pool.pop() {
        Some(mut item) => {
            reset(&mut item);
            item
        }
        None => factory(),
    }
}

/// Return an object to a thread-local pool. If the pool has reached `max`
/// capacity, the object is dropped.
pub(crate) fn tl_release<T>(pool: &RefCell<Vec<T>>, max: usize, item: T) {
    let mut pool = pool.borrow_mut();
    if pool.len() < max {
        pool.push(item);
    }
}
