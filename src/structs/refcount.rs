//! # RefCount Module
//!
//! Explicit atomic reference count cell shared by buffer handles.
//!
//! A count starts at one. `retain` increments it, `release` decrements it and
//! reports when the last reference went away. Releasing a count that has already
//! reached zero is a programming error and panics.

use std::sync::atomic::{AtomicI64, Ordering, fence};

#[derive(Debug)]
pub struct RefCount(AtomicI64);

impl RefCount {
    /// New count holding one reference.
    #[inline]
    pub fn new() -> Self {
        RefCount(AtomicI64::new(1))
    }

    /// Adds a reference.
    #[inline]
    pub fn retain(&self) {
        let prev = self.0.fetch_add(1, Ordering::Relaxed);
        debug_assert!(prev > 0, "retain on a released reference count");
    }

    /// Drops a reference. Returns `true` when this was the last one, in which case
    /// the caller owns the release of the guarded resource.
    #[inline]
    pub fn release(&self) -> bool {
        let prev = self.0.fetch_sub(1, Ordering::Release);
        if prev <= 0 {
            panic!("too many releases");
        }
        if prev == 1 {
            fence(Ordering::Acquire);
            return true;
        }
        false
    }

    /// Current count.
    #[inline]
    pub fn load(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_retain_release() {
        let rc = RefCount::new();
        rc.retain();
        assert_eq!(rc.load(), 2);
        assert!(!rc.release());
        assert!(rc.release());
        assert_eq!(rc.load(), 0);
    }

    #[test]
    #[should_panic(expected = "too many releases")]
    fn test_over_release_panics() {
        let rc = RefCount::new();
        assert!(rc.release());
        rc.release();
    }

    #[test]
    fn test_concurrent_retain_release() {
        let rc = Arc::new(RefCount::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rc = rc.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        rc.retain();
                        assert!(!rc.release());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(rc.load(), 1);
    }
}
