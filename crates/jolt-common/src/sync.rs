//! Concurrency primitives shared across the bundler.
//!
//! `WaitGroup` exists because the obvious alternative is not safe against
//! concurrent `add` and `wait`: workers discover new files while the
//! coordinator may already be waiting, so the counter and the wakeup must
//! be one atomic protocol. `Semaphore` bounds the number of file handles
//! open at once so large builds cannot exhaust the process fd limit.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::sync::{Condvar, Mutex};

/// A wait group with one waiter and many contributors.
///
/// `add` may race with `wait`: if the counter reaches zero while more work
/// is about to be added, the queued notification is consumed and waiting
/// resumes. Driving the counter negative is a programmer error and panics.
pub struct WaitGroup {
    counter: AtomicI64,
    tx: SyncSender<()>,
    rx: Mutex<Receiver<()>>,
}

impl WaitGroup {
    #[must_use]
    pub fn new() -> WaitGroup {
        let (tx, rx) = sync_channel(1);
        WaitGroup {
            counter: AtomicI64::new(0),
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Add `delta` outstanding items. Panics if the counter goes negative.
    pub fn add(&self, delta: i64) {
        let value = self.counter.fetch_add(delta, Ordering::SeqCst) + delta;
        if value < 0 {
            panic!("WaitGroup counter must not be negative");
        }
        if value == 0 {
            // Non-blocking: the buffer holds one pending notification and
            // a full buffer means a wakeup is already queued.
            let _ = self.tx.try_send(());
        }
    }

    /// Mark one item done.
    pub fn done(&self) {
        self.add(-1);
    }

    /// Block until the counter reaches zero. Only one thread may wait.
    pub fn wait(&self) {
        loop {
            if self.counter.load(Ordering::SeqCst) == 0 {
                return;
            }
            let rx = self.rx.lock().unwrap_or_else(|e| e.into_inner());
            rx.recv().expect("WaitGroup notification channel closed");
            // A stale notification may predate a subsequent add; re-check.
            if self.counter.load(Ordering::SeqCst) == 0 {
                return;
            }
        }
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        WaitGroup::new()
    }
}

/// A counting semaphore built on a mutex and condvar.
///
/// Every code path that opens a file, reads it, or lists a directory must
/// hold a permit across the syscall. The capacity bounds concurrent open
/// handles system-wide.
pub struct Semaphore {
    state: Mutex<usize>,
    available: Condvar,
}

/// The file-open semaphore capacity used by the real filesystem.
pub const FILE_HANDLE_LIMIT: usize = 32;

impl Semaphore {
    #[must_use]
    pub fn new(permits: usize) -> Semaphore {
        Semaphore {
            state: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Acquire one permit, blocking until one is free.
    pub fn acquire(&self) -> SemaphorePermit<'_> {
        let mut permits = self.state.lock().unwrap_or_else(|e| e.into_inner());
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(|e| e.into_inner());
        }
        *permits -= 1;
        SemaphorePermit { semaphore: self }
    }

    fn release(&self) {
        let mut permits = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *permits += 1;
        drop(permits);
        self.available.notify_one();
    }
}

/// RAII guard returned by [`Semaphore::acquire`].
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

/// Acquire a permit that owns a reference to the semaphore, for guards that
/// must outlive the borrow (open file handles).
pub fn acquire_owned(semaphore: &std::sync::Arc<Semaphore>) -> OwnedSemaphorePermit {
    let guard = semaphore.acquire();
    std::mem::forget(guard);
    OwnedSemaphorePermit {
        semaphore: std::sync::Arc::clone(semaphore),
    }
}

/// RAII guard returned by [`acquire_owned`].
pub struct OwnedSemaphorePermit {
    semaphore: std::sync::Arc<Semaphore>,
}

impl Drop for OwnedSemaphorePermit {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}
