//! Per-digest extraction lock.
//!
//! At most one extraction per digest runs at a time within a process. A
//! second requester for the same digest blocks until the first releases its
//! guard, after which it re-checks the cache and normally finds a hit.

use crate::ContentDigest;
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub(crate) struct InFlight {
    active: Mutex<HashSet<ContentDigest>>,
    released: Condvar,
}

impl InFlight {
    // A panic while holding the lock cannot leave the set inconsistent (every
    // mutation is a single insert or remove), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashSet<ContentDigest>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until no one else holds `digest`, then hold it.
    ///
    /// Callers must not hold another guard while acquiring a second one.
    pub(crate) fn acquire(&self, digest: ContentDigest) -> InFlightGuard<'_> {
        let mut active = self.lock();
        while active.contains(&digest) {
            tracing::debug!(%digest, "waiting for in-flight extraction");
            active = self.released.wait(active).unwrap_or_else(PoisonError::into_inner);
        }
        active.insert(digest);
        InFlightGuard { registry: self, digest }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self, digest: &ContentDigest) -> bool {
        self.lock().contains(digest)
    }
}

#[must_use]
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    registry: &'a InFlight,
    digest: ContentDigest,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.digest);
        self.registry.released.notify_all();
    }
}
