// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::Release;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Owns one engine handle and releases it when dropped.
///
/// Session code never calls `release()` directly; dropping the lease on any
/// exit path (including `?` returns) frees the engine-side resource exactly
/// once. Wrap a lease in an `Arc` to share it: the handle is released when
/// the last clone goes away.
pub struct Lease<T: ?Sized + Release> {
    handle: Arc<T>,
}

impl<T: ?Sized + Release> Lease<T> {
    pub fn new(handle: Arc<T>) -> Self {
        Self { handle }
    }

    /// Shared reference to the handle, for passing into engine calls.
    ///
    /// Holding the returned `Arc` does not keep the resource alive past the
    /// lease.
    pub fn share(&self) -> Arc<T> {
        Arc::clone(&self.handle)
    }
}

impl<T: ?Sized + Release> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.handle
    }
}

impl<T: ?Sized + Release> Drop for Lease<T> {
    fn drop(&mut self) {
        self.handle.release();
    }
}

impl<T: ?Sized + Release> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lease(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counted(AtomicUsize);

    impl Release for Counted {
        fn release(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_release_on_drop() {
        let handle = Arc::new(Counted(AtomicUsize::new(0)));
        {
            let _lease = Lease::new(Arc::clone(&handle));
        }
        assert_eq!(handle.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_on_error_path() {
        fn acquire_then_fail(handle: Arc<Counted>) -> Result<(), &'static str> {
            let _lease = Lease::new(handle);
            Err::<(), _>("later step failed")?;
            Ok(())
        }

        let handle = Arc::new(Counted(AtomicUsize::new(0)));
        assert!(acquire_then_fail(Arc::clone(&handle)).is_err());
        assert_eq!(handle.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_lease_releases_once() {
        let handle = Arc::new(Counted(AtomicUsize::new(0)));
        let shared = Arc::new(Lease::new(Arc::clone(&handle)));
        let clone = Arc::clone(&shared);

        drop(shared);
        assert_eq!(handle.0.load(Ordering::SeqCst), 0);
        drop(clone);
        assert_eq!(handle.0.load(Ordering::SeqCst), 1);
    }
}
